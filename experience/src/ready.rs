use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use futures::channel::oneshot;

use crate::ResourceError;

/// One-shot signal. Opens at most once; every waiter, whether created before
/// or after the gate opened, resolves exactly once.
#[derive(Default)]
pub struct ReadyGate {
    open: bool,
    waiters: Vec<oneshot::Sender<()>>,
}

impl ReadyGate {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn wait(&mut self) -> Ready {
        let (sender, receiver) = oneshot::channel();
        if self.open {
            // the receiver is held by the returned future, so the send cannot fail
            let _ = sender.send(());
        } else {
            self.waiters.push(sender);
        }
        Ready {
            receiver,
            resolved: false,
        }
    }

    /// Opens the gate. Returns `false` if it was already open.
    pub fn open(&mut self) -> bool {
        if self.open {
            return false;
        }
        self.open = true;
        for waiter in self.waiters.drain(..) {
            // dropped waiters are not interested anymore
            let _ = waiter.send(());
        }
        true
    }
}

/// Completion of a [`ReadyGate`].
///
/// Await it, or call [`Ready::poll_ready`] once per frame from a render loop.
pub struct Ready {
    receiver: oneshot::Receiver<()>,
    resolved: bool,
}

impl Ready {
    pub fn poll_ready(&mut self) -> bool {
        if !self.resolved {
            self.resolved = matches!(self.receiver.try_recv(), Ok(Some(())));
        }
        self.resolved
    }
}

impl Future for Ready {
    type Output = Result<(), ResourceError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.resolved {
            return Poll::Ready(Ok(()));
        }
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(())) => {
                self.resolved = true;
                Poll::Ready(Ok(()))
            }
            Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(Err(ResourceError::Abandoned)),
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn waiters_before_and_after_opening_resolve() {
        let mut gate = ReadyGate::new();
        let mut early = gate.wait();
        assert!(!early.poll_ready());

        assert!(gate.open());
        assert!(!gate.open());

        let mut late = gate.wait();
        assert!(early.poll_ready());
        assert!(late.poll_ready());
        // stays resolved
        assert!(early.poll_ready());
        block_on(early).unwrap();
        block_on(late).unwrap();
    }

    #[test]
    fn dropping_the_gate_abandons_waiters() {
        let mut gate = ReadyGate::new();
        let mut waiter = gate.wait();
        drop(gate);
        assert!(!waiter.poll_ready());
        assert!(matches!(block_on(waiter), Err(ResourceError::Abandoned)));
    }
}
