//=========================================================================
// Input
//=========================================================================
//
// Platform-neutral input events and the bindings that turn them into
// shell commands.
//
// Event Flow:
// ```text
//   winit ─► platform::InputProcessor ─► InputEvent
//                                            │
//                     InputEngine ─► CommandMapper ─► Command ─► mode loop
// ```
//
//=========================================================================

//=== Module Declarations =================================================

pub mod command;
pub mod event;

//=== Public API ==========================================================

pub use command::{Command, CommandContext, CommandMapper};
pub use event::{InputEvent, KeyCode, Modifiers, MouseButton};
