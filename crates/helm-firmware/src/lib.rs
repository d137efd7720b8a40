//! ESP32-S3 firmware-specific modules for helm-rs
//!
//! This crate contains hardware-specific code that cannot compile on
//! desktop targets: peripheral initialization and the capacitive touch
//! controller driver feeding the core event queue.

#![no_std]

pub mod touch;
