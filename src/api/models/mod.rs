// Models module - contains Service, Icon, UserLink and enums

pub mod enums;
pub mod icon;
pub mod service;
pub mod user_link;

pub use enums::{ColorScheme, IconStyle, Role};
pub use icon::{Icon, IconPatch, NewIcon};
pub use service::{NewService, Service, ServiceFilter, ServicePatch};
pub use user_link::{NewUserLink, UserLink, UserLinkPatch};
