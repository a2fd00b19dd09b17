//! Store Plan editor: pointer and keyboard input, the interaction state
//! machine, zoom and pan, and the [`EditorSession`] that owns the store.

pub mod input;
pub mod interaction;
pub mod session;
pub mod shortcuts;
pub mod viewport;

pub use input::{InputEvent, Modifiers};
pub use interaction::{EditorMutation, Gesture, Interaction, InteractionContext};
pub use session::{EditorSession, Notice, NoticeLevel};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use viewport::Viewport;
