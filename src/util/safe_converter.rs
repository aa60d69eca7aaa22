/// For widening casts that can not lose information on any supported platform.
pub trait SafeCast<T> {
    fn safe_cast(self) -> T;
}

#[cfg(any(target_pointer_width = "16", target_pointer_width = "32", target_pointer_width = "64"))]
impl SafeCast<u64> for usize {
    fn safe_cast(self) -> u64 {
        self as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::zero(0, 0)]
    #[case::payload(1424, 1424)]
    #[case::max_datagram(65536, 65536)]
    fn test_usize_to_u64(#[case] value: usize, #[case] expected: u64) {
        let widened: u64 = value.safe_cast();
        assert_eq!(widened, expected);
    }
}
