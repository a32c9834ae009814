//! Session runner for the cube clicker economy.
//!
//! This crate owns the one mutable [`EconomyState`] of a player session and
//! serialises every change to it through a single event loop:
//!
//! ```text
//!  SessionHandle ──commands──┐
//!                            ▼
//!  tick timer ──────────► session loop ──► Game (EconomyState + rates)
//!                            │
//!                            └── debounced flush ──► StateStore
//! ```
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `clicker-config.yaml`.
//! - [`game`] -- [`Game`], the single-owner session context.
//! - [`tick`] -- One passive-accrual step.
//! - [`persist`] -- [`FlushScheduler`], the debounce window bookkeeping.
//! - [`session`] -- The async loop and its [`SessionHandle`].
//!
//! [`EconomyState`]: clicker_types::EconomyState
//! [`Game`]: game::Game
//! [`FlushScheduler`]: persist::FlushScheduler
//! [`SessionHandle`]: session::SessionHandle

pub mod config;
pub mod game;
pub mod persist;
pub mod session;
pub mod tick;
