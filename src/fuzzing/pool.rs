use super::*;

// allocate on `true`, release the `n % live`-th live handle on `false`.
qc!(pool_model, _pool_model);
fn _pool_model(ops: Vec<(bool, u8)>) -> bool {
    let mut pool: Pool<u32> = Pool::new(PoolConfig::default().block_capacity(4));
    let mut live: Vec<(NodeHandle, u32)> = Vec::new();
    let mut released: Vec<NodeHandle> = Vec::new();

    for (i, (alloc, n)) in ops.into_iter().enumerate() {
        if alloc || live.is_empty() {
            let value = i as u32;
            let handle = pool.allocate(value).unwrap();
            live.push((handle, value));
        } else {
            let (handle, value) = live.swap_remove(n as usize % live.len());
            if pool.release(handle) != Some(value) {
                return false;
            }
            released.push(handle);
        }
        if pool.len() != live.len() {
            return false;
        }
    }

    live.iter().all(|(h, v)| pool.get(*h) == Some(v))
        && released.iter().all(|h| pool.get(*h).is_none() && !pool.contains(*h))
}

// a bounded pool never hands out more slots than its configuration permits.
qc!(pool_bounded, _pool_bounded);
fn _pool_bounded((capacity, blocks, count): (u8, u8, u8)) -> bool {
    let config = PoolConfig::default()
        .block_capacity(capacity as usize % 8 + 1)
        .max_blocks(blocks as usize % 4);
    let max = config.max_slots().unwrap();
    let mut pool = Pool::new(config);
    (0..count as usize).all(|i| match pool.allocate(i) {
        Ok(_) => i < max,
        Err(Error::OutOfMemory { .. }) => i >= max,
        Err(_) => false,
    }) && pool.len() == max.min(count as usize)
}
