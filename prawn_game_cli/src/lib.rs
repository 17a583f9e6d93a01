//! The Prawn Game: a shuffled deck of conversation cards.
//!
//! The deck session and turn rotation are plain in-memory state machines;
//! `game::Game` drives them in lock-step for whatever front end embeds it.

pub mod catalog;
pub mod deck;
pub mod game;
pub mod input;
pub mod logger;
pub mod prompt;
pub mod rotation;
pub mod shuffle;
