//! # Domain Types
//!
//! Core domain types used throughout the back office.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  catalog                      staff                                     │
//! │  ┌──────────┐ ┌───────────┐   ┌──────────┐   ┌───────────┐             │
//! │  │ Category │ │ SalesItem │   │ Position │◄──│ Employee  │             │
//! │  └──────────┘ └─────┬─────┘   └──────────┘   └─────┬─────┘             │
//! │  ┌──────────┐       │ recipe                        │                   │
//! │  │ Product  │◄──────┘                               │                   │
//! │  └────┬─────┘                                       │                   │
//! │       │                                             │                   │
//! │  journal (per business day)        scheduling       │                   │
//! │  ┌──────────────┐                  ┌───────────────┐│                   │
//! │  │ DailyRecord  │                  │ ShiftTemplate ││                   │
//! │  │ ├ Snapshot   │ opening/closing  └──────┬────────┘│                   │
//! │  │ ├ Receipt    │ deliveries              ▼         ▼                   │
//! │  │ ├ SaleEntry  │ POS lines        ┌───────────────────┐               │
//! │  │ └ Expense    │                  │      Shift        │               │
//! │  └──────────────┘                  └───────────────────┘               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity has a UUID v4 `id` stored as a string.

mod catalog;
mod journal;
mod scheduling;
mod staff;

pub use catalog::*;
pub use journal::*;
pub use scheduling::*;
pub use staff::*;
