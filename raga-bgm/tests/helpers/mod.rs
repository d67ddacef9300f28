//! Shared helpers for raga-bgm integration tests

#![allow(dead_code)]

pub mod audio_generator;
pub mod stub_gemini;
