//! PromoSync - plan entitlements, usage metering and deal metrics.
//!
//! The crate gates creator-platform features by subscription tier,
//! meters monthly quotas for the actions that have them, and condenses
//! a creator's deals, applications and payments into the dashboard
//! metrics view.
//!
//! Layout follows ports and adapters: `domain` is pure, `ports` names the
//! storage and clock seams, `adapters` implements them, and
//! `application` wires one subscriber session together.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
