use crate::error::ActorError;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A single opaque message parameter.
///
/// Parameters are reference counted and immutable, so cloning a `Message`
/// (e.g. to forward a copy) never copies payload data.
pub type Param = Arc<dyn Any + Send + Sync>;

/// Wraps any sendable value as a message parameter.
pub fn into_param<T: Any + Send + Sync>(value: T) -> Param {
  Arc::new(value)
}

/// An ordered, immutable sequence of opaque parameters delivered to an actor.
///
/// The runtime never looks inside a message. Behaviors recover the values they
/// expect with [`Message::get`] or [`Message::param`].
#[derive(Clone, Default)]
pub struct Message {
  params: Vec<Param>,
}

impl Message {
  /// Creates an empty message with no parameters.
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates a message from already-wrapped parameters, keeping their order.
  pub fn from_params(params: Vec<Param>) -> Self {
    Self { params }
  }

  /// Appends one parameter, consuming the message under construction.
  pub fn with<T: Any + Send + Sync>(mut self, value: T) -> Self {
    self.params.push(into_param(value));
    self
  }

  /// Number of parameters.
  pub fn len(&self) -> usize {
    self.params.len()
  }

  pub fn is_empty(&self) -> bool {
    self.params.is_empty()
  }

  /// All parameters, in order.
  pub fn params(&self) -> &[Param] {
    &self.params
  }

  pub fn iter(&self) -> impl Iterator<Item = &Param> {
    self.params.iter()
  }

  /// Returns the parameter at `index` if it exists and holds a `T`.
  pub fn get<T: Any>(&self, index: usize) -> Option<&T> {
    self.params.get(index).and_then(|p| p.downcast_ref::<T>())
  }

  /// Like [`Message::get`], but explains what went wrong.
  ///
  /// Intended for behaviors that prefer `?` over nested matches.
  pub fn param<T: Any>(&self, index: usize) -> Result<&T, ActorError> {
    let raw = self.params.get(index).ok_or(ActorError::MissingParam {
      index,
      len: self.params.len(),
    })?;
    raw.downcast_ref::<T>().ok_or_else(|| ActorError::param_type::<T>(index))
  }

  /// Returns `true` if the parameter at `index` holds a `T`.
  pub fn is<T: Any>(&self, index: usize) -> bool {
    self.get::<T>(index).is_some()
  }

  /// Reads a string parameter stored either as `&'static str` or `String`.
  pub fn str_at(&self, index: usize) -> Option<&str> {
    self
      .get::<&'static str>(index)
      .copied()
      .or_else(|| self.get::<String>(index).map(String::as_str))
  }
}

impl fmt::Debug for Message {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    // Payloads are opaque; show strings when we can, otherwise just a marker.
    let mut list = f.debug_list();
    for index in 0..self.params.len() {
      match self.str_at(index) {
        Some(s) => list.entry(&s),
        None => list.entry(&Opaque),
      };
    }
    list.finish()
  }
}

struct Opaque;

impl fmt::Debug for Opaque {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("<opaque>")
  }
}

impl FromIterator<Param> for Message {
  fn from_iter<I: IntoIterator<Item = Param>>(iter: I) -> Self {
    Self::from_params(iter.into_iter().collect())
  }
}

/// Builds a [`Message`](crate::Message) from a variable-length list of values.
///
/// ```
/// let msg = tinyactor::message!["ping", 42u32];
/// assert_eq!(msg.len(), 2);
/// assert_eq!(msg.str_at(0), Some("ping"));
/// assert_eq!(msg.get::<u32>(1), Some(&42));
/// ```
#[macro_export]
macro_rules! message {
  () => {
    $crate::Message::new()
  };
  ($($value:expr),+ $(,)?) => {
    $crate::Message::from_params(vec![$($crate::message::into_param($value)),+])
  };
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn params_keep_order_and_type() {
    let msg = Message::new().with("start").with(7usize).with(String::from("tail"));
    assert_eq!(msg.len(), 3);
    assert_eq!(msg.str_at(0), Some("start"));
    assert_eq!(msg.get::<usize>(1), Some(&7));
    assert_eq!(msg.str_at(2), Some("tail"));
    assert!(msg.get::<u32>(1).is_none());
  }

  #[test]
  fn param_reports_shape_mismatch() {
    let msg = crate::message!["only"];
    assert_eq!(
      msg.param::<u8>(3).unwrap_err(),
      ActorError::MissingParam { index: 3, len: 1 }
    );
    assert!(matches!(
      msg.param::<u8>(0),
      Err(ActorError::ParamType { index: 0, .. })
    ));
    assert_eq!(*msg.param::<&'static str>(0).unwrap(), "only");
  }

  #[test]
  fn clones_share_parameters() {
    let original = crate::message![vec![1u8, 2, 3]];
    let copy = original.clone();
    assert!(Arc::ptr_eq(&original.params()[0], &copy.params()[0]));
    assert!(crate::message![].is_empty());
  }

  #[test]
  fn debug_hides_opaque_payloads() {
    let msg = crate::message!["hello", 1u8];
    assert_eq!(format!("{:?}", msg), r#"["hello", <opaque>]"#);
  }
}
