//! プール用バッキングストレージの確保
//!
//! 確保失敗を `PoolError::Allocation` として返せるよう、
//! `Vec::try_reserve_exact` 経由で確保してから埋める。

use std::collections::TryReserveError;

use crate::error::PoolError;

/// 長さ `len` のスライスを確保し、`init(i)` で埋める
///
/// 容量は先に確保済みなので、埋める途中で再確保は起きない。
pub(super) fn try_boxed_slice<T>(
    len: usize,
    init: impl FnMut(usize) -> T,
) -> Result<Box<[T]>, TryReserveError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)?;
    buf.extend((0..len).map(init));
    Ok(buf.into_boxed_slice())
}

/// `TryReserveError` をバイト数つきの `PoolError` に変換する
pub(super) fn allocation_error<T>(len: usize, source: TryReserveError) -> PoolError {
    PoolError::Allocation {
        bytes: len.saturating_mul(std::mem::size_of::<T>()),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_boxed_slice_fills_in_order() {
        let slice = try_boxed_slice(5, |i| i * 10).unwrap();
        assert_eq!(&*slice, &[0, 10, 20, 30, 40]);
    }

    #[test]
    fn test_try_boxed_slice_reports_capacity_overflow() {
        let err = try_boxed_slice::<u64>(usize::MAX, |_| 0).unwrap_err();
        let pool_err = allocation_error::<u64>(usize::MAX, err);
        assert!(matches!(pool_err, PoolError::Allocation { bytes: usize::MAX, .. }));
    }
}
