#![forbid(unsafe_code)]

mod analysis;
mod definitions;
mod dependencies;
mod dispatch;
mod graph;
mod render;

pub(crate) use definitions::tool_definitions;
pub(crate) use dispatch::dispatch_tool;
