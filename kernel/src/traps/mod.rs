//! Interrupt and exception handling.

mod handlers;
mod idt;

pub use idt::{init_idt, KEYBOARD_VECTOR, TIMER_VECTOR};
