mod arena;
mod handle;
mod node;
mod raw_vobtree_map;
mod validate;

pub(crate) use raw_vobtree_map::RawVOBTreeMap;
