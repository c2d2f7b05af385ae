//! # Core Application Logic
//!
//! This module contains TrueNotion's conversation logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                  ┌─────────────┴─────────────┐
//!                  ▼                           ▼
//!           ┌────────────┐              ┌────────────┐
//!           │    TUI     │              │ Transport  │
//!           │  Adapter   │              │ (http/echo)│
//!           │ (ratatui)  │              │            │
//!           └────────────┘              └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all conversation state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`controller`]: send / reconcile / finish / clear over `App`
//! - [`store`]: the ordered transcript with change counters
//! - [`view`]: what to draw for the current transcript
//! - [`markdown`]: Markdown source to a block tree
//! - [`config`]: layered configuration

pub mod action;
pub mod config;
pub mod controller;
pub mod markdown;
pub mod message;
pub mod state;
pub mod store;
pub mod view;
