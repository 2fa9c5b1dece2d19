//! Scroll animation math

pub mod cursor;

pub use cursor::ScrollCursor;
