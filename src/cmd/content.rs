//! Public content commands: `posts`, `projects` and `service`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use console::style;

use agency_desk::currency::{Currency, display_price, parse_price_string};
use agency_desk::models::{BlogPost, NewBlogPost, NewProject, Project};
use agency_desk::notify::Toast;
use agency_desk::store::{Mutation, ResourceTag};
use agency_desk::ui::render::render_body;

use super::super::{PostCommands, ProjectCommands};
use super::{Desk, print_json, print_page};

fn post_body(content: Option<String>, file: Option<PathBuf>) -> Result<String> {
    match (content, file) {
        (Some(content), _) => Ok(content),
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display())),
        (None, None) => bail!("Provide the post body with --content or --file"),
    }
}

fn show_post(post: &BlogPost) {
    println!();
    println!("{}", style(&post.title).bold());
    let meta: Vec<&str> = [post.author.as_deref(), post.category.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !meta.is_empty() {
        println!("{}", style(meta.join(" · ")).dim());
    }
    println!();
    print!("{}", render_body(&post.content));
    println!();
}

fn show_project(project: &Project) {
    println!();
    println!("{}", style(&project.title).bold());
    if let Some(client) = &project.client {
        println!("  client    {}", client);
    }
    if let Some(category) = &project.category {
        println!("  category  {}", category);
    }
    if !project.technologies.is_empty() {
        println!("  stack     {}", project.technologies.join(", "));
    }
    if let Some(url) = &project.live_url {
        println!("  live      {}", url);
    }
    if !project.description.is_empty() {
        println!();
        print!("{}", render_body(&project.description));
    }
    println!();
}

pub async fn cmd_posts(desk: &mut Desk, command: PostCommands) -> Result<()> {
    match command {
        PostCommands::List { page } => {
            let posts = desk
                .fetch("Loading posts...", desk.client.list_posts())
                .await?;
            desk.store.write(ResourceTag::Posts, posts.clone());
            if desk.is_json() {
                return print_json(&posts);
            }
            println!();
            if posts.is_empty() {
                println!("No posts yet.");
                return Ok(());
            }
            print_page(&posts, page, desk.page_size(None), |p| {
                format!(
                    "  #{:<5} {:<48} {}",
                    p.id,
                    p.title,
                    p.category.as_deref().unwrap_or("")
                )
            });
            println!();
        }
        PostCommands::Show { id } => {
            let post = desk
                .fetch("Loading post...", desk.client.get_post(id))
                .await?;
            if desk.is_json() {
                return print_json(&post);
            }
            show_post(&post);
        }
        PostCommands::Create {
            title,
            content,
            file,
            category,
        } => {
            desk.require_admin().await?;
            let post = NewBlogPost {
                title,
                content: post_body(content, file)?,
                category,
            };
            let created = desk
                .fetch("Publishing...", desk.client.create_post(&post))
                .await?;
            desk.mutated(Mutation::PostChanged);
            desk.notifier
                .notify(Toast::success(format!("Published post #{}", created.id)));
        }
        PostCommands::Delete { id, force } => {
            desk.require_admin().await?;
            if !desk.confirm(&format!("Delete post #{}?", id), force) {
                println!("Cancelled.");
                return Ok(());
            }
            desk.fetch("Deleting...", desk.client.delete_post(id))
                .await?;
            desk.mutated(Mutation::PostChanged);
            desk.notifier
                .notify(Toast::success(format!("Deleted post #{}", id)));
        }
    }
    Ok(())
}

pub async fn cmd_projects(desk: &mut Desk, command: ProjectCommands) -> Result<()> {
    match command {
        ProjectCommands::List { page, timeout } => {
            let limit = Duration::from_secs(timeout.max(1));
            let projects = match desk
                .fetch(
                    "Loading projects...",
                    desk.client.list_projects_within(limit),
                )
                .await
            {
                Ok(projects) => projects,
                Err(err) => {
                    desk.notifier.notify(Toast::error("Could not load projects"));
                    return Err(err);
                }
            };
            desk.store.write(ResourceTag::Projects, projects.clone());
            if desk.is_json() {
                return print_json(&projects);
            }
            println!();
            if projects.is_empty() {
                println!("No projects yet.");
                return Ok(());
            }
            print_page(&projects, page, desk.page_size(None), |p| {
                format!(
                    "  #{:<5} {:<40} {}",
                    p.id,
                    p.title,
                    p.client.as_deref().unwrap_or("")
                )
            });
            println!();
        }
        ProjectCommands::Show { id } => {
            let project = desk
                .fetch("Loading project...", desk.client.get_project(id))
                .await?;
            if desk.is_json() {
                return print_json(&project);
            }
            show_project(&project);
        }
        ProjectCommands::Create {
            title,
            description,
            category,
            client,
            tech,
            live_url,
        } => {
            desk.require_admin().await?;
            let project = NewProject {
                title,
                description,
                category,
                client,
                technologies: tech
                    .into_iter()
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect(),
                live_url,
            };
            let created = desk
                .fetch("Saving project...", desk.client.create_project(&project))
                .await?;
            desk.mutated(Mutation::ProjectChanged);
            desk.notifier
                .notify(Toast::success(format!("Added project #{}", created.id)));
        }
        ProjectCommands::Delete { id, force } => {
            desk.require_admin().await?;
            if !desk.confirm(&format!("Delete project #{}?", id), force) {
                println!("Cancelled.");
                return Ok(());
            }
            desk.fetch("Deleting...", desk.client.delete_project(id))
                .await?;
            desk.mutated(Mutation::ProjectChanged);
            desk.notifier
                .notify(Toast::success(format!("Deleted project #{}", id)));
        }
    }
    Ok(())
}

/// The starting price line, e.g. `From $275.00`. Unparseable prices are
/// shown as the backend sent them.
fn starting_price(raw: &str, currency: Currency) -> String {
    match parse_price_string(raw) {
        Some(amount) => format!("From {}", display_price(amount, currency)),
        None => raw.to_string(),
    }
}

pub async fn cmd_service(desk: &mut Desk, slug: &str, currency: Option<&str>) -> Result<()> {
    let currency = match currency {
        Some(code) => code.parse::<Currency>().map_err(|e| anyhow::anyhow!(e))?,
        None => desk.config.currency(),
    };
    let service = desk
        .fetch("Loading service...", desk.client.get_service(slug))
        .await?;

    if desk.is_json() {
        return print_json(&service);
    }
    println!();
    println!("{}", style(&service.title).bold());
    if let Some(raw) = &service.starting_price {
        println!("{}", style(starting_price(raw, currency)).green());
    }
    if !service.description.is_empty() {
        println!();
        print!("{}", render_body(&service.description));
    }
    if !service.features.is_empty() {
        println!();
        for feature in &service.features {
            println!("  • {}", feature);
        }
    }
    println!();
    Ok(())
}
