// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The mutex used across the Strand crates (non-poisoning `parking_lot`).

pub use parking_lot::Mutex;
