//! Connection traits shared by views, loops and subscriptions.

/// A resource that can be released.
///
/// Implementations must tolerate `dispose` being called more than once.
pub trait Disposable: Send + Sync {
    fn dispose(&self);
}

/// A connection that receives values of type `I` until it is disposed.
///
/// A view hands one of these to a controller when it connects: `accept`
/// renders a model, `dispose` tears the view binding down.
///
/// # Example
///
/// ```rust
/// use std::sync::Mutex;
/// use tether::core::{Connection, Disposable};
///
/// struct Label {
///     text: Mutex<String>,
/// }
///
/// impl Disposable for Label {
///     fn dispose(&self) {}
/// }
///
/// impl Connection<String> for Label {
///     fn accept(&self, value: String) {
///         if let Ok(mut text) = self.text.lock() {
///             *text = value;
///         }
///     }
/// }
/// ```
pub trait Connection<I>: Disposable {
    fn accept(&self, value: I);
}

impl<T: Disposable + ?Sized> Disposable for Box<T> {
    fn dispose(&self) {
        (**self).dispose()
    }
}

impl<T: Disposable + ?Sized> Disposable for std::sync::Arc<T> {
    fn dispose(&self) {
        (**self).dispose()
    }
}

impl<I, T: Connection<I> + ?Sized> Connection<I> for Box<T> {
    fn accept(&self, value: I) {
        (**self).accept(value)
    }
}

impl<I, T: Connection<I> + ?Sized> Connection<I> for std::sync::Arc<T> {
    fn accept(&self, value: I) {
        (**self).accept(value)
    }
}
