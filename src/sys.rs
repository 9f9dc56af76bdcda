// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0

//! Platform shims.

pub mod time {
    //! Monotonic clock for wait deadlines.
    //!
    //! `std::time::Instant` panics on wasm32-unknown-unknown, so the browser build uses
    //! `web_time` instead.

    #[cfg(not(target_arch = "wasm32"))]
    pub use std::time::Instant;

    #[cfg(target_arch = "wasm32")]
    pub use web_time::Instant;
}
