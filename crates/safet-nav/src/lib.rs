// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod controller;
pub mod effect;
pub mod error;
pub mod ids;
pub mod labels;
pub mod model;
pub mod router;
pub mod state;

pub use controller::*;
pub use effect::*;
pub use error::*;
pub use ids::*;
pub use labels::*;
pub use model::*;
pub use router::*;
pub use state::*;
