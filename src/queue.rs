use crossbeam_channel::{Receiver, Sender, unbounded};

// Unbounded on purpose: the single writer drains fast enough for LAN-sized
// bursts, and a bounded queue would push back into the network callback.
#[derive(Debug)]
pub struct BlockingQueue<T> {
    tx: Sender<T>,
    rx: Receiver<T>,
}

impl<T> BlockingQueue<T> {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn push(&self, item: T) {
        // Cannot disconnect while this handle holds both ends.
        let _ = self.tx.send(item);
    }

    pub fn pop(&self) -> Option<T> {
        self.rx.recv().ok()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl<T> Clone for BlockingQueue<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            rx: self.rx.clone(),
        }
    }
}

impl<T> Default for BlockingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
