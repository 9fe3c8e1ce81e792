//! Terminal presentation: icons, a request spinner, and text renderers for
//! boards, task tables and documents.

pub mod icons;
pub mod render;
pub mod spinner;

pub use render::OutputMode;
pub use spinner::Spinner;
