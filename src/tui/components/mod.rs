//! # TUI Components
//!
//! This module contains all UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! Components in this directory follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Simple display components built fresh each frame from the data they show:
//! - `TitleBar`: Top status bar showing backend, status and errors
//! - `Message`: One conversation turn as a Markdown bubble
//! - `LandingPage`: Welcome content for an empty transcript
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that manage local state and emit events:
//! - `InputBox`: Multi-line text input
//! - `MessageList`: Scrollable transcript with layout caching
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (Top status bar)
//! ├── landing.rs       (Introduction view and its delayed reveal)
//! ├── message.rs       (Single message and typing indicator)
//! ├── message_list.rs  (Scrollable message container)
//! └── input_box/       (Text input)
//!     ├── mod.rs       (Component and event handling)
//!     ├── cursor.rs    (Cursor movement and scrolling)
//!     └── text_wrap.rs (Row layout)
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod input_box;
pub mod landing;
pub mod message;
pub mod message_list;

pub use input_box::{InputBox, InputEvent};
pub use landing::{DelayedReveal, LandingPage};
pub use message_list::{MessageList, MessageListState};
