cfg_loom! {
    #[allow(unused_imports)]
    pub(crate) use loom::thread::*;

    /// loom threads can't be named, so the name is dropped.
    pub(crate) fn spawn_named<F>(_name: &str, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        loom::thread::spawn(f);
    }
}

cfg_not_loom! {
    #[allow(unused_imports)]
    pub(crate) use std::thread::*;

    /// Spawns a detached, named thread.
    ///
    /// # Panics
    ///
    /// Panics if the OS refuses to create the thread, like [`std::thread::spawn`].
    pub(crate) fn spawn_named<F>(name: &str, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        Builder::new()
            .name(name.to_owned())
            .spawn(f)
            .expect("failed to spawn thread");
    }
}
