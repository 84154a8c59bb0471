//! Completion signal abstractions
//!
//! The display module raises an interrupt line once it has finished
//! replaying a synchronous frame. The interrupt handler calls
//! [`CompletionSignal::notify`]; the transport waits on it.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;

/// Single-slot "module finished" notification
pub trait CompletionSignal {
    /// Clear any pending notification
    fn reset(&self);

    /// Mark the module as finished (interrupt side)
    fn notify(&self);

    /// Block until a notification is pending, consuming it
    fn wait(&self);

    /// Check for a pending notification without consuming it
    fn is_notified(&self) -> bool;
}

impl<M: RawMutex> CompletionSignal for Signal<M, ()> {
    fn reset(&self) {
        Signal::reset(self);
    }

    fn notify(&self) {
        self.signal(());
    }

    fn wait(&self) {
        embassy_futures::block_on(Signal::wait(self));
    }

    fn is_notified(&self) -> bool {
        self.signaled()
    }
}

impl<T: CompletionSignal + ?Sized> CompletionSignal for &T {
    fn reset(&self) {
        T::reset(self);
    }

    fn notify(&self) {
        T::notify(self);
    }

    fn wait(&self) {
        T::wait(self);
    }

    fn is_notified(&self) -> bool {
        T::is_notified(self)
    }
}
