use appointer_domain::{Entity, ID};
use std::sync::{Mutex, MutexGuard};

/// Useful functions for creating inmemory repositories

// A poisoned lock only means another test thread panicked, the data is still usable
fn lock<T>(collection: &Mutex<Vec<T>>) -> MutexGuard<'_, Vec<T>> {
    collection
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Returns the first item matching `compare`, or inserts `val` and returns it.
/// Both happen under the same lock.
pub fn find_or_insert<T: Clone, F: Fn(&T) -> bool>(
    val: &T,
    collection: &Mutex<Vec<T>>,
    compare: F,
) -> T {
    let mut collection = lock(collection);
    if let Some(existing) = collection.iter().find(|item| compare(item)) {
        return existing.clone();
    }
    collection.push(val.clone());
    val.clone()
}

pub fn find<T: Clone + Entity>(val_id: &ID, collection: &Mutex<Vec<T>>) -> Option<T> {
    let collection = lock(collection);
    collection.iter().find(|item| item.id() == val_id).cloned()
}

pub fn find_by<T: Clone, F: FnMut(&T) -> bool>(
    collection: &Mutex<Vec<T>>,
    mut compare: F,
) -> Vec<T> {
    let collection = lock(collection);
    collection
        .iter()
        .filter(|item| compare(item))
        .cloned()
        .collect()
}

/// Applies `update` to every item matching `compare` and returns the number of updated items
pub fn update_many<T, F: Fn(&T) -> bool, U: Fn(&mut T)>(
    collection: &Mutex<Vec<T>>,
    compare: F,
    update: U,
) -> usize {
    let mut collection = lock(collection);
    let mut updated = 0;
    for item in collection.iter_mut().filter(|item| compare(item)) {
        update(item);
        updated += 1;
    }
    updated
}

/// Runs `f` with both collections locked, always in the same order
pub fn with_both<A, B, R, F: FnOnce(&mut Vec<A>, &mut Vec<B>) -> R>(
    first: &Mutex<Vec<A>>,
    second: &Mutex<Vec<B>>,
    f: F,
) -> R {
    let mut first = lock(first);
    let mut second = lock(second);
    f(&mut first, &mut second)
}
