//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as fields:
//! - `TitleBar`: top bar with screen, user and status
//! - `Message`: one transcript entry
//! - `NoticeOverlay` / `ConfirmOverlay`: popups over the current screen
//! - `LoginView`, `Dashboard`, `ResultView`, `HistoryView`, `ChatView`: screens
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that keep local state in `TuiState` and emit events:
//! - `InputBox`: username field and chat composer
//! - `MessageList`: scrollable transcript with layout caching
//! - `Menu`: numbered action list used by the dashboard and result screens
//! - `QuestionnaireView`: highlighted option on the current question
//! - `SessionPicker`: past conversations
//!
//! Screens receive data as props (struct fields borrowed from `App`), never
//! by reaching into global state. Each file holds the state type, the event
//! type, rendering, event handling and tests for its component.
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs            (this file)
//! ├── title_bar.rs      (top status bar)
//! ├── mood_badge.rs     (icon + coloured mood label)
//! ├── notice.rs         (notice and confirm popups)
//! ├── input_box.rs      (text field)
//! ├── menu.rs           (numbered action list)
//! ├── message.rs        (single transcript entry)
//! ├── message_list.rs   (scrollable transcript)
//! ├── login.rs          (username screen)
//! ├── dashboard.rs      (greeting + main menu)
//! ├── questionnaire.rs  (one question at a time)
//! ├── result.rs         (detected mood)
//! ├── history.rs        (mood timeline)
//! ├── session_picker.rs (past conversations)
//! └── chat.rs           (transcript + composer)
//! ```

pub mod chat;
pub mod dashboard;
pub mod history;
pub mod input_box;
pub mod login;
pub mod menu;
pub mod message;
pub mod message_list;
pub mod mood_badge;
pub mod notice;
pub mod questionnaire;
pub mod result;
pub mod session_picker;
mod title_bar;

pub use chat::ChatView;
pub use dashboard::{Dashboard, DashboardItem};
pub use history::{HistoryState, HistoryView};
pub use input_box::{InputBox, InputEvent};
pub use login::LoginView;
pub use menu::{Menu, MenuState};
pub use message_list::{MessageList, MessageListState};
pub use notice::{ConfirmOverlay, NoticeOverlay};
pub use questionnaire::{QuestionnaireEvent, QuestionnaireState, QuestionnaireView};
pub use result::{ResultItem, ResultView};
pub use session_picker::{SessionPicker, SessionPickerEvent, SessionPickerState};
pub use title_bar::TitleBar;
