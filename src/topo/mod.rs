pub mod addressing;
pub mod fat_tree;

pub use addressing::FatTreeAddressing;
pub use fat_tree::{FatTreeOpts, FatTreeTopology, build_fat_tree};
