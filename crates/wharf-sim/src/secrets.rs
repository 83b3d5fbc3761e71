// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.


//! Hidden authentication strings and the workers that check them.
//!
//! A `SecretBook` lazily draws one hidden string per dock and length, the
//! first time any worker is asked about that combination. The book is
//! shared by every worker so they all agree on the answer.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use wharf_auth::{enumerator::CandidateSpace, worker::Verifier};
use wharf_model::index::{DockIndex, WorkerIndex};

#[derive(Debug)]
struct Book {
    rng: ChaCha8Rng,
    secrets: FxHashMap<(DockIndex, usize), String>,
}

#[derive(Debug, Clone)]
pub struct SecretBook {
    inner: Arc<Mutex<Book>>,
}

impl SecretBook {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Book {
                rng: ChaCha8Rng::seed_from_u64(seed),
                secrets: FxHashMap::default(),
            })),
        }
    }

    #[inline]
    fn lock(&self) -> MutexGuard<'_, Book> {
        // The book holds no invariant a panicking holder could break.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// The hidden string of `dock` for searches of `length` symbols, or
    /// `None` if no such string can be drawn.
    pub fn secret(&self, dock: DockIndex, length: usize) -> Option<String> {
        let mut book = self.lock();
        if let Some(secret) = book.secrets.get(&(dock, length)) {
            return Some(secret.clone());
        }

        let space = CandidateSpace::new(length).ok()?;
        let index = book.rng.random_range(0..space.total());
        let secret = space.candidate(index);
        book.secrets.insert((dock, length), secret.clone());
        Some(secret)
    }

    /// The hidden string if it was already drawn.
    pub fn peek(&self, dock: DockIndex, length: usize) -> Option<String> {
        self.lock().secrets.get(&(dock, length)).cloned()
    }

    /// Creates the verifier run by worker `worker`.
    #[inline]
    pub fn verifier(&self, worker: WorkerIndex) -> SecretVerifier {
        SecretVerifier {
            book: self.clone(),
            worker,
            checked: 0,
        }
    }
}

#[derive(Debug)]
pub struct SecretVerifier {
    book: SecretBook,
    worker: WorkerIndex,
    checked: u64,
}

impl Verifier for SecretVerifier {
    fn begin_search(&mut self, dock: DockIndex) {
        tracing::trace!(worker = %self.worker, %dock, checked = self.checked, "search announced");
    }

    fn verify(&mut self, dock: DockIndex, candidate: &str) -> bool {
        self.checked += 1;
        self.book
            .secret(dock, candidate.len())
            .is_some_and(|secret| secret == candidate)
    }
}
