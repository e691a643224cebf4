use core::fmt::Debug;

/// The agent type an action stack drives.
///
/// The engine treats actors as opaque. It only needs a stable identity for logs
/// and the handle types that flow through events and queries:
/// - `Entity`: something the actor remembers (a sighting, an item, a blocker, a threat)
/// - `Point`: an aim point returned by target selection
pub trait Actor: 'static {
    type Entity: Copy + PartialEq + Debug + 'static;
    type Point: Copy + PartialEq + Debug + 'static;

    fn stable_id(&self) -> u64;
}
