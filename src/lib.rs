//! Find unused image, color, and data assets in Xcode project trees.

pub mod cli;
pub mod scanner;

pub use cli::execute;
pub use scanner::{
    matches_any, scan, AssetType, DiscoveredAsset, Options, PathFilter, ScanError, ScanResult,
};
