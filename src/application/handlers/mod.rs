//! Use-case handlers.

pub mod greet_call;
pub mod process_turn;

pub use greet_call::{GreetCallCommand, GreetCallHandler};
pub use process_turn::{ProcessTurnHandler, TurnCommand, TurnReply};
