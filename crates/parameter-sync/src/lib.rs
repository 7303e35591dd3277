//! Cross-layer parameter coordination.
//!
//! Layers showing the same quantity share legends and axis controls. This
//! crate groups layers by equivalent [`covjson::Parameter`] and reports when
//! groups appear and disappear:
//!
//! - [`ParameterSync`]: the synchronous reconciler
//! - [`ParameterMatcher`] / [`DefaultMatcher`]: the equivalence strategy
//! - [`SyncService`] / [`SyncHandle`]: the reconciler on its own tokio task
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use covjson::{ObservedProperty, Parameter};
//! use parameter_sync::{LayerId, ParameterSource, ParameterSync};
//!
//! struct Layer {
//!     id: LayerId,
//!     parameter: Option<Parameter>,
//! }
//!
//! impl ParameterSource for Layer {
//!     fn layer_id(&self) -> &LayerId {
//!         &self.id
//!     }
//!     fn parameter(&self) -> Option<&Parameter> {
//!         self.parameter.as_ref()
//!     }
//! }
//!
//! let sst = Parameter::new(ObservedProperty::new("SST").with_id("sst"));
//! let mut sync = ParameterSync::new();
//! let a = sync.add_layer(Arc::new(Layer { id: "a".into(), parameter: Some(sst.clone()) }));
//! let b = sync.add_layer(Arc::new(Layer { id: "b".into(), parameter: Some(sst) }));
//! assert_eq!(a, b);
//! ```

pub mod config;
pub mod error;
pub mod layer;
pub mod matcher;
pub mod reconciler;
pub mod service;

pub use config::SyncConfig;
pub use error::{Result, SyncError};
pub use layer::{combine_extents, LayerId, ParameterSource};
pub use matcher::{DefaultMatcher, ParameterMatcher};
pub use reconciler::{GroupEvent, GroupId, GroupView, ParameterSync};
pub use service::{SyncHandle, SyncService};
