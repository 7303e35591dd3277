//! Grouping of layers by equivalent parameter.
//!
//! A group exists while at least one attached layer shows its parameter.
//! The first layer whose parameter matches no existing group creates one and
//! supplies its canonical parameter; the group is discarded as soon as its
//! last layer is removed.

use std::collections::HashMap;
use std::sync::Arc;

use covjson::Parameter;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::layer::{combine_extents, LayerId, ParameterSource};
use crate::matcher::{DefaultMatcher, ParameterMatcher};

/// Identifier of a parameter group, unique for the lifetime of a reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub u64);

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "group-{}", self.0)
    }
}

/// Read-only snapshot of a parameter group.
pub struct GroupView<L> {
    pub id: GroupId,
    pub parameter: Arc<Parameter>,
    layers: Vec<Arc<L>>,
}

impl<L> Clone for GroupView<L> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            parameter: Arc::clone(&self.parameter),
            layers: self.layers.clone(),
        }
    }
}

impl<L: ParameterSource> std::fmt::Debug for GroupView<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupView")
            .field("id", &self.id)
            .field("parameter", &self.parameter.observed_property.id)
            .field("layers", &self.layer_ids())
            .finish()
    }
}

impl<L: ParameterSource> GroupView<L> {
    /// Layers in the group, in attach order.
    pub fn layers(&self) -> &[Arc<L>] {
        &self.layers
    }

    pub fn layer_ids(&self) -> Vec<&LayerId> {
        self.layers.iter().map(|l| l.layer_id()).collect()
    }

    pub fn contains(&self, id: &LayerId) -> bool {
        self.layers.iter().any(|l| l.layer_id() == id)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Value extent spanning every layer in the group.
    pub fn combined_extent(&self) -> Option<(f64, f64)> {
        combine_extents(self.layers.iter().filter_map(|l| l.value_extent()))
    }
}

/// Group lifecycle notification.
pub enum GroupEvent<L> {
    /// A group was created for a parameter no other group matched.
    Added(GroupView<L>),
    /// The last layer of a group was removed.
    Removed(GroupView<L>),
}

impl<L> Clone for GroupEvent<L> {
    fn clone(&self) -> Self {
        match self {
            GroupEvent::Added(view) => GroupEvent::Added(view.clone()),
            GroupEvent::Removed(view) => GroupEvent::Removed(view.clone()),
        }
    }
}

impl<L: ParameterSource> std::fmt::Debug for GroupEvent<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupEvent::Added(view) => f.debug_tuple("Added").field(view).finish(),
            GroupEvent::Removed(view) => f.debug_tuple("Removed").field(view).finish(),
        }
    }
}

impl<L> GroupEvent<L> {
    pub fn view(&self) -> &GroupView<L> {
        match self {
            GroupEvent::Added(view) | GroupEvent::Removed(view) => view,
        }
    }
}

type Listener<L> = Box<dyn FnMut(&GroupEvent<L>) + Send>;

struct ParameterGroup<L> {
    id: GroupId,
    parameter: Arc<Parameter>,
    layers: Vec<Arc<L>>,
}

impl<L> ParameterGroup<L> {
    fn view(&self) -> GroupView<L> {
        GroupView {
            id: self.id,
            parameter: Arc::clone(&self.parameter),
            layers: self.layers.clone(),
        }
    }
}

/// Tracks which layers show equivalent parameters.
///
/// Not thread-safe for concurrent mutation; drive it from one task, or use
/// [`crate::service::SyncService`] to serialize access.
pub struct ParameterSync<L, M = DefaultMatcher> {
    matcher: M,
    groups: Vec<ParameterGroup<L>>,
    membership: HashMap<LayerId, GroupId>,
    listeners: Vec<Listener<L>>,
    next_id: u64,
}

impl<L: ParameterSource> ParameterSync<L> {
    /// Create a reconciler using [`DefaultMatcher`].
    pub fn new() -> Self {
        Self::with_matcher(DefaultMatcher)
    }
}

impl<L: ParameterSource> Default for ParameterSync<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ParameterSource, M: ParameterMatcher> ParameterSync<L, M> {
    /// Create a reconciler with a custom match strategy.
    pub fn with_matcher(matcher: M) -> Self {
        Self {
            matcher,
            groups: Vec::new(),
            membership: HashMap::new(),
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Register a listener for group lifecycle events.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&GroupEvent<L>) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Attach a layer to the group matching its parameter.
    ///
    /// Layers without a parameter are ignored and yield `None`. A layer that
    /// is already attached stays where it is.
    pub fn add_layer(&mut self, layer: Arc<L>) -> Option<GroupId> {
        let parameter = layer.parameter()?;
        let layer_id = layer.layer_id().clone();

        if let Some(&group_id) = self.membership.get(&layer_id) {
            warn!(layer = %layer_id, group = %group_id, "Layer already attached");
            return Some(group_id);
        }

        let position = self
            .groups
            .iter()
            .position(|g| self.matcher.matches(&g.parameter, parameter));

        let group_id = match position {
            Some(i) => {
                let group = &mut self.groups[i];
                group.layers.push(layer);
                debug!(
                    layer = %layer_id,
                    group = %group.id,
                    size = group.layers.len(),
                    "Layer joined parameter group"
                );
                group.id
            }
            None => {
                let group = ParameterGroup {
                    id: GroupId(self.next_id),
                    parameter: Arc::new(parameter.clone()),
                    layers: vec![layer],
                };
                self.next_id += 1;
                let id = group.id;
                let view = group.view();
                self.groups.push(group);
                debug!(
                    layer = %layer_id,
                    group = %id,
                    observed_property = ?view.parameter.observed_property.id,
                    "Created parameter group"
                );
                self.emit(GroupEvent::Added(view));
                id
            }
        };

        self.membership.insert(layer_id, group_id);
        Some(group_id)
    }

    /// Detach a layer from its group, discarding the group if it empties.
    ///
    /// Returns `false` if the layer was not attached.
    pub fn remove_layer(&mut self, layer_id: &LayerId) -> bool {
        let Some(group_id) = self.membership.remove(layer_id) else {
            return false;
        };
        let Some(pos) = self.groups.iter().position(|g| g.id == group_id) else {
            warn!(layer = %layer_id, group = %group_id, "Membership points at a missing group");
            return false;
        };

        let group = &mut self.groups[pos];
        group.layers.retain(|l| l.layer_id() != layer_id);

        if group.layers.is_empty() {
            let group = self.groups.remove(pos);
            debug!(layer = %layer_id, group = %group.id, "Removed parameter group");
            self.emit(GroupEvent::Removed(group.view()));
        } else {
            debug!(
                layer = %layer_id,
                group = %group_id,
                size = group.layers.len(),
                "Layer left parameter group"
            );
        }
        true
    }

    /// Snapshots of all groups, in creation order.
    pub fn groups(&self) -> Vec<GroupView<L>> {
        self.groups.iter().map(ParameterGroup::view).collect()
    }

    pub fn group(&self, id: GroupId) -> Option<GroupView<L>> {
        self.groups.iter().find(|g| g.id == id).map(ParameterGroup::view)
    }

    /// The group a layer is attached to.
    pub fn group_of(&self, layer_id: &LayerId) -> Option<GroupView<L>> {
        self.membership.get(layer_id).and_then(|&id| self.group(id))
    }

    /// The group whose canonical parameter matches `parameter`.
    pub fn find_group(&self, parameter: &Parameter) -> Option<GroupView<L>> {
        self.groups
            .iter()
            .find(|g| self.matcher.matches(&g.parameter, parameter))
            .map(ParameterGroup::view)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    fn emit(&mut self, event: GroupEvent<L>) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use covjson::{ObservedProperty, Unit};
    use std::sync::Mutex;

    struct TestLayer {
        id: LayerId,
        parameter: Option<Parameter>,
        extent: Option<(f64, f64)>,
    }

    impl ParameterSource for TestLayer {
        fn layer_id(&self) -> &LayerId {
            &self.id
        }

        fn parameter(&self) -> Option<&Parameter> {
            self.parameter.as_ref()
        }

        fn value_extent(&self) -> Option<(f64, f64)> {
            self.extent
        }
    }

    fn layer(id: &str, property: Option<&str>) -> Arc<TestLayer> {
        Arc::new(TestLayer {
            id: LayerId::from(id),
            parameter: property.map(|p| {
                Parameter::new(ObservedProperty::new(p).with_id(p)).with_unit(Unit::kelvin())
            }),
            extent: None,
        })
    }

    fn recording(sync: &mut ParameterSync<TestLayer>) -> Arc<Mutex<Vec<String>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        sync.subscribe(move |event| {
            let entry = match event {
                GroupEvent::Added(v) => format!("added {}", v.id),
                GroupEvent::Removed(v) => format!("removed {}", v.id),
            };
            sink.lock().unwrap().push(entry);
        });
        log
    }

    #[test]
    fn test_matching_layers_share_group() {
        let mut sync = ParameterSync::new();
        let events = recording(&mut sync);

        let a = sync.add_layer(layer("a", Some("sst"))).unwrap();
        let b = sync.add_layer(layer("b", Some("sst"))).unwrap();

        assert_eq!(a, b);
        assert_eq!(sync.len(), 1);
        let group = sync.group(a).unwrap();
        assert_eq!(group.layer_ids(), vec![&LayerId::from("a"), &LayerId::from("b")]);
        assert_eq!(*events.lock().unwrap(), vec!["added group-0"]);
    }

    #[test]
    fn test_different_properties_never_group() {
        let mut sync = ParameterSync::new();
        let a = sync.add_layer(layer("a", Some("sst"))).unwrap();
        let b = sync.add_layer(layer("b", Some("sal"))).unwrap();
        assert_ne!(a, b);
        assert_eq!(sync.len(), 2);
    }

    #[test]
    fn test_layer_without_parameter_is_ignored() {
        let mut sync = ParameterSync::new();
        let events = recording(&mut sync);
        assert_eq!(sync.add_layer(layer("basemap", None)), None);
        assert!(sync.is_empty());
        assert!(!sync.remove_layer(&LayerId::from("basemap")));
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_group_lifecycle() {
        let mut sync = ParameterSync::new();
        let events = recording(&mut sync);

        let id = sync.add_layer(layer("a", Some("sst"))).unwrap();
        sync.add_layer(layer("b", Some("sst")));

        assert!(sync.remove_layer(&LayerId::from("a")));
        let group = sync.group(id).unwrap();
        assert_eq!(group.layer_ids(), vec![&LayerId::from("b")]);

        assert!(sync.remove_layer(&LayerId::from("b")));
        assert!(sync.group(id).is_none());
        assert!(!sync.remove_layer(&LayerId::from("b")));

        assert_eq!(
            *events.lock().unwrap(),
            vec!["added group-0", "removed group-0"]
        );
    }

    #[test]
    fn test_duplicate_attach_is_noop() {
        let mut sync = ParameterSync::new();
        let a = layer("a", Some("sst"));
        let first = sync.add_layer(Arc::clone(&a));
        let second = sync.add_layer(a);
        assert_eq!(first, second);
        assert_eq!(sync.groups()[0].len(), 1);
    }

    #[test]
    fn test_group_ids_not_reused() {
        let mut sync = ParameterSync::new();
        let first = sync.add_layer(layer("a", Some("sst"))).unwrap();
        sync.remove_layer(&LayerId::from("a"));
        let second = sync.add_layer(layer("a", Some("sst"))).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_custom_matcher() {
        let mut sync: ParameterSync<TestLayer, _> =
            ParameterSync::with_matcher(|_: &Parameter, _: &Parameter| true);
        sync.add_layer(layer("a", Some("sst")));
        sync.add_layer(layer("b", Some("sal")));
        assert_eq!(sync.len(), 1);
        assert_eq!(sync.groups()[0].len(), 2);
    }

    #[test]
    fn test_combined_extent() {
        let mut sync = ParameterSync::new();
        let extents = [("a", Some((270.0, 280.0))), ("b", None), ("c", Some((265.0, 275.0)))];
        for (id, extent) in extents {
            sync.add_layer(Arc::new(TestLayer {
                id: LayerId::from(id),
                parameter: Some(Parameter::new(ObservedProperty::new("sst").with_id("sst"))),
                extent,
            }));
        }
        let group = sync.group_of(&LayerId::from("b")).unwrap();
        assert_eq!(group.combined_extent(), Some((265.0, 280.0)));
    }

    #[test]
    fn test_find_group_and_snapshot_isolation() {
        let mut sync = ParameterSync::new();
        sync.add_layer(layer("a", Some("sst")));
        let snapshot = sync.groups();

        sync.add_layer(layer("b", Some("sst")));

        assert_eq!(snapshot[0].len(), 1);
        let query =
            Parameter::new(ObservedProperty::new("sst").with_id("sst")).with_unit(Unit::kelvin());
        assert_eq!(sync.find_group(&query).unwrap().len(), 2);
        assert!(snapshot[0].contains(&LayerId::from("a")));
    }
}
