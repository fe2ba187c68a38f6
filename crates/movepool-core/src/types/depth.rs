//! 探索深さの上限

/// 最大探索深度（YaneuraOu準拠）
///
/// プールの既定 `depth_capacity` はここから決まる。
pub const MAX_PLY: usize = 246;

/// 1フレームが自分の指し手リスト以外に同時に持ちうるリスト数の上限
///
/// ルートの合法手列挙や1手詰め判定など、同じ ply で一時的に
/// もう1本リストを生成する経路の分だけ余裕を持たせる。
pub const AUX_LISTS_PER_THREAD: usize = 10;

// 定数間の関係をコンパイル時に検証する
const _: () = {
    assert!(MAX_PLY > 0);
    assert!(MAX_PLY <= u32::MAX as usize);
    assert!(AUX_LISTS_PER_THREAD > 0);
};
