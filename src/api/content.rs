use std::time::Duration;

use tracing::warn;

use super::ApiClient;
use crate::errors::{ApiError, ValidationError};
use crate::models::{BlogPost, Id, NewBlogPost, NewProject, Project, Service, Testimonial};

const POSTS: &str = "/blog/blogs/";
const PROJECTS: &str = "/project/projects/";

fn require_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::new("title", "Title is required"));
    }
    Ok(())
}

impl ApiClient {
    pub async fn list_posts(&self) -> Result<Vec<BlogPost>, ApiError> {
        self.get_list(POSTS).await
    }

    pub async fn get_post(&self, id: Id) -> Result<BlogPost, ApiError> {
        self.get_json(&format!("{}{}/", POSTS, id)).await
    }

    pub async fn create_post(&self, post: &NewBlogPost) -> Result<BlogPost, ApiError> {
        require_title(&post.title)?;
        self.post_json(POSTS, post).await
    }

    pub async fn delete_post(&self, id: Id) -> Result<(), ApiError> {
        self.delete(&format!("{}{}/", POSTS, id)).await
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.get_list(PROJECTS).await
    }

    /// Like `list_projects`, but gives up after `limit`. The in-flight
    /// request is dropped, which cancels it.
    pub async fn list_projects_within(&self, limit: Duration) -> Result<Vec<Project>, ApiError> {
        match tokio::time::timeout(limit, self.list_projects()).await {
            Ok(result) => result,
            Err(_) => {
                warn!(path = PROJECTS, ?limit, "projects fetch abandoned");
                Err(ApiError::Timeout {
                    path: PROJECTS.to_string(),
                })
            }
        }
    }

    pub async fn get_project(&self, id: Id) -> Result<Project, ApiError> {
        self.get_json(&format!("{}{}/", PROJECTS, id)).await
    }

    pub async fn create_project(&self, project: &NewProject) -> Result<Project, ApiError> {
        require_title(&project.title)?;
        self.post_json(PROJECTS, project).await
    }

    pub async fn delete_project(&self, id: Id) -> Result<(), ApiError> {
        self.delete(&format!("{}{}/", PROJECTS, id)).await
    }

    pub async fn get_service(&self, slug: &str) -> Result<Service, ApiError> {
        let slug = slug.trim().trim_matches('/');
        if slug.is_empty() {
            return Err(ValidationError::new("slug", "Service slug is required").into());
        }
        self.get_json(&format!("/services/services/{}/", slug))
            .await
    }

    pub async fn list_testimonials(&self) -> Result<Vec<Testimonial>, ApiError> {
        self.get_list("/testimonials/testimonials/").await
    }
}
