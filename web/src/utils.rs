use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, TimeDelta, Utc};
use gloo::storage::{LocalStorage, Storage};
use serde::Serialize;
use serde::de::DeserializeOwned;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct ModalProps {
    #[prop_or_default]
    pub children: Html,
}

/// Helper component to attach the contents into the document.body instead of in the place where it's used.
#[function_component]
pub(crate) fn Modal(props: &ModalProps) -> Html {
    let modal_host = gloo::utils::body();
    create_portal(props.children.clone(), modal_host.into())
}

/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}

pub(crate) fn utc_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
}

/// Elapsed time as `m:ss`.
pub(crate) fn format_elapsed(elapsed: TimeDelta) -> String {
    let secs = elapsed.num_seconds().max(0);
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Local storage slot for a value, versioned in the key.
pub(crate) trait StorageKey {
    const KEY: &'static str;
}

pub(crate) trait LocalOrDefault: Sized {
    fn local_or_default() -> Self;
    fn local_save(&self);
}

impl<T: StorageKey + Default + Serialize + DeserializeOwned> LocalOrDefault for T {
    fn local_or_default() -> Self {
        LocalStorage::get(T::KEY).unwrap_or_default()
    }

    fn local_save(&self) {
        if let Err(err) = LocalStorage::set(T::KEY, self) {
            log::error!("Could not save {} to local storage: {:?}", T::KEY, err);
        }
    }
}

/// Passes an owned value into a component created later; the first `take` wins.
///
/// Props compare by identity, so a fresh handoff always means a fresh value.
pub(crate) struct Handoff<T>(Rc<RefCell<Option<T>>>);

impl<T> Handoff<T> {
    pub(crate) fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(Some(value))))
    }

    pub(crate) fn take(&self) -> Option<T> {
        self.0.borrow_mut().take()
    }
}

impl<T> Clone for Handoff<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> PartialEq for Handoff<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handoff_yields_once_and_compares_by_identity() {
        let handoff = Handoff::new(7);
        let copy = handoff.clone();

        assert!(handoff == copy);
        assert!(handoff != Handoff::new(7));
        assert_eq!(copy.take(), Some(7));
        assert_eq!(handoff.take(), None);
    }

    #[test]
    fn elapsed_is_minutes_and_padded_seconds() {
        assert_eq!(format_elapsed(TimeDelta::seconds(65)), "1:05");
        assert_eq!(format_elapsed(TimeDelta::seconds(-3)), "0:00");
    }
}
