// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

pub mod chunk_by_composition_tests;
pub mod chunk_by_error_tests;
pub mod chunk_by_lifetime_tests;
