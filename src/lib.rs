pub mod auth;
pub mod config;
pub mod data;
pub mod exception;
pub mod param;
pub mod render;
pub mod request;
pub mod response;
pub mod template;
pub mod util;

pub use auth::AuthCodec;
pub use config::Config;
pub use data::{to_data, Data};
pub use exception::Exception;
pub use render::{
    FileTemplateProvider, MemoryTemplateProvider, PageRenderer, RequestContext, TemplateProvider,
    User,
};
pub use response::{json_response, marshal_json, HeaderData, JsonResponse, Link, PageData, SafeHtml};
pub use template::Template;
