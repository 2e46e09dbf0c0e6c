// A poisoned lock means a thread panicked inside a critical section, after which the
// bucket bookkeeping can no longer be trusted (we panic).
pub(crate) const ERR_POISONED_LOCK: &str = "encountered poisoned lock - continued execution \
    is not safe because the pool's bookkeeping may have been left in an inconsistent state";
