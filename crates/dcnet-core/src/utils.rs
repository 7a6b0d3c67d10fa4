use rayon::prelude::*;

/// Splits `data` into one chunk per CPU, maps each chunk with `f` in parallel, and flattens the
/// results. The output order is unspecified.
pub(crate) fn par_chunks<T, F, R>(data: &[T], f: F) -> impl Iterator<Item = R>
where
    T: Sync,
    R: Send,
    F: Fn(&[T]) -> Vec<R> + Sync,
{
    let (s, r) = crossbeam_channel::unbounded();
    let nr_cpus = num_cpus::get();
    let chunk_size = std::cmp::max(data.len() / nr_cpus, 1);
    data.chunks(chunk_size)
        .par_bridge()
        .for_each_with(s, |s, chunk| {
            let v = f(chunk);
            s.send(v).unwrap(); // channel will not become disconnected
        });
    r.into_iter().flatten()
}
