//! # Core Application Logic
//!
//! This module contains Mira's business logic.
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
//!                    │  No network. No UI.     │
//!                    └───────────┬─────────────┘
//!                                │ Effect::Request
//!            ┌───────────────────┴───────────────────┐
//!            ▼                                       ▼
//!     ┌────────────┐                          ┌────────────┐
//!     │    TUI     │ ── spawns dispatch() ──▶ │    API     │
//!     │  Adapter   │ ◀──── Action ─────────── │  Gateway   │
//!     │ (ratatui)  │                          │ (reqwest)  │
//!     └────────────┘                          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`identity`]: username validation, login form, username cache
//! - [`questionnaire`]: question bank and the ten-step wizard
//! - [`mood`]: label → icon/class/description table
//! - [`history`]: history rows and timestamp formatting
//! - [`chat`]: chat transcript and send lifecycle
//! - [`validation`]: local validation errors
//! - [`config`]: config file and override chain

pub mod action;
pub mod chat;
pub mod config;
pub mod history;
pub mod identity;
pub mod mood;
pub mod questionnaire;
pub mod state;
pub mod validation;
