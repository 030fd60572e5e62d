use fixed::types::I32F32;

/// Q32.32 fixed-point: 32 integer bits, 32 fractional bits.
pub type Fixed64 = I32F32;

/// Signed currency amount. All prices and action costs use this type so
/// that cost accumulation is bit-identical on every peer.
pub type Money = Fixed64;

/// Build a money value from a whole number of currency units.
#[inline]
pub fn money(units: i32) -> Money {
    Money::from_num(units)
}

/// Convert an f64 to Money. Use only for initialization, never in an action.
#[inline]
pub fn f64_to_money(v: f64) -> Money {
    Money::from_num(v)
}

/// Convert Money to f64. Use only for display.
#[inline]
pub fn money_to_f64(v: Money) -> f64 {
    v.to_num::<f64>()
}

/// Checked addition that returns None on overflow.
#[inline]
pub fn checked_add_money(a: Money, b: Money) -> Option<Money> {
    a.checked_add(b)
}

/// Checked multiplication of a price by a whole count.
#[inline]
pub fn checked_mul_count(price: Money, count: i64) -> Option<Money> {
    price.checked_mul_int(count)
}
