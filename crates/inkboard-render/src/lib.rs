//! Board IR and layout engine for `inkboard`.
//!
//! The layout engine turns already-fetched news entries and a weather report
//! into backend-agnostic draw commands for one fixed-size board page. It is
//! a pure, single pass over in-memory data: no I/O, no shared state, and no
//! errors for degenerate inputs.

#![cfg_attr(
    not(test),
    deny(
        clippy::disallowed_methods,
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::panic_in_result_fn,
        clippy::todo,
        clippy::unimplemented
    )
)]

mod board_ir;
mod board_layout;
mod board_text;

pub use board_ir::{
    BoardPage, DrawCommand, FontRole, IconCommand, IconId, IconTable, Region, RuleCommand,
    TextCommand, TextSize,
};
pub use board_layout::{BoardComposer, BoardConfig, OverflowPolicy, ProfileError};
pub use board_text::{
    format_range, format_temperature, truncate_chars, wrap_words, TextMeasurer, ELLIPSIS,
    RANGE_SEPARATOR,
};
