// engine module: background API worker

pub mod code;
mod interface;
pub mod stub;

pub use code::CodeEngine;
pub use interface::{Engine, EngineHandle, Event, Mutation, Request, SearchKind};
pub use stub::StubEngine;
