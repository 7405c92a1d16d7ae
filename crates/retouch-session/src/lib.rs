// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// retouch-session — Holds decoded originals under opaque handles for a fixed
// time-to-live. The pixel engine never sees this crate; the service layer
// fetches a buffer here and hands a copy to the engine.

pub mod clock;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use store::{MemorySessionStore, SessionStore};
