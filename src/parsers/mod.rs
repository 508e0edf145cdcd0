pub mod features;
pub mod icon;
pub mod links;
pub mod slug;

pub use features::extract as extract_features;
pub use icon::{resolve as resolve_icon, Icon, GENERIC_ICON};
pub use links::LinkPreview;
pub use slug::normalize;

