pub mod links;
pub mod resolver;

pub use links::{resolve_deep_link, DeepLinkTarget, DEEP_LINK_SCHEME};
pub use resolver::{resolve_sale_code, ResolutionSource, SaleCodeResolution};
