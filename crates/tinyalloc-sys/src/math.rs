pub const fn is_aligned(value: usize, align: usize) -> Option<bool> {
  if !align.is_power_of_two() {
    return None;
  }
  Some((value & (align - 1)) == 0)
}

pub const fn align_up(value: usize, align: usize) -> Option<usize> {
  if !align.is_power_of_two() {
    return None;
  }

  let mask = align - 1;
  if let Some(sum) = value.checked_add(mask) {
    return Some(sum & !mask);
  }

  None
}

/// Distance from `addr` to the next multiple of `align`.
pub const fn align_offset(addr: usize, align: usize) -> Option<usize> {
  match align_up(addr, align) {
    Some(aligned) => Some(aligned - addr),
    None => None,
  }
}

/// Number of `unit`-sized pieces needed to hold `value` bytes.
pub const fn div_ceil(value: usize, unit: usize) -> Option<usize> {
  if unit == 0 {
    return None;
  }

  match value.checked_add(unit - 1) {
    Some(sum) => Some(sum / unit),
    None => None,
  }
}
