//! Test cases for the LoopbackInterface.

use rstest::*;

use instrumentrs::{InstrumentInterface, LoopbackInterface};

/// A function that creates a new `LoopbackInterface` with the given input and output vectors.
fn crt_lbk(input: Vec<&str>, output: Vec<&str>) -> LoopbackInterface {
    LoopbackInterface::new(input, output)
}

/// Create a loopback interface that contains no commands.
#[fixture]
fn emp_lbk() -> LoopbackInterface {
    crt_lbk(vec![], vec![])
}

/// Ensure `finalize` method passes if an empty loopback interface is used.
///
/// This routine calls the finalize method manually, however, it is not necessary to do so as it is
/// implemented in the `Drop` trait for `LoopbackInterface`.
#[rstest]
fn finalize_test(mut emp_lbk: LoopbackInterface) {
    emp_lbk.finalize();
}

/// Ensure the interface panics on drop if commands are left in the loopback interface.
#[rstest]
#[case(vec!["R"], vec![])]
#[case(vec![], vec!["screen"])]
#[case(vec!["R"], vec!["screen"])]
#[should_panic]
fn finalize_test_panic(#[case] from_host: Vec<&str>, #[case] from_inst: Vec<&str>) {
    let _ = crt_lbk(from_host, from_inst);
}

/// Bytes that were handed out only partially must be read before the interface is dropped.
#[rstest]
#[should_panic]
fn finalize_test_panic_unread_bytes() {
    let mut lbk = crt_lbk(vec![], vec!["screen"]);
    let _ = lbk.read_budget(2).unwrap();
}

#[rstest]
fn write_raw() {
    let mut lbk = crt_lbk(vec!["I", "2"], vec![]);
    lbk.write_raw(b"I").unwrap();
    lbk.write("2").unwrap();
}

#[rstest]
#[should_panic]
fn write_mismatch() {
    let mut lbk = crt_lbk(vec!["R"], vec![]);
    let _ = lbk.write("I");
}

/// Writing more than scripted panics.
#[rstest]
#[should_panic]
fn write_unexpected(mut emp_lbk: LoopbackInterface) {
    let _ = emp_lbk.write("R");
}

#[rstest]
fn query() {
    let mut lbk = crt_lbk(vec!["\r", "R"], vec!["first\r\n", "second\r\n"]);
    lbk.write("\r").unwrap();
    assert_eq!(lbk.read_text(1000).unwrap(), "first\r\n");

    lbk.write("R").unwrap();
    assert_eq!(lbk.read_text(1000).unwrap(), "second\r\n");
}

/// Responses larger than the budget stay buffered for the next read.
#[rstest]
fn read_budget_split() {
    let mut lbk = crt_lbk(vec![], vec!["0123456789"]);
    assert_eq!(lbk.read_budget(4).unwrap(), b"0123");
    assert_eq!(lbk.read_budget(1000).unwrap(), b"456789");
}

/// An empty response simulates a read that timed out.
#[rstest]
fn read_timeout() {
    let mut lbk = crt_lbk(vec![], vec![""]);
    assert!(lbk.read_text(1000).unwrap().is_empty());
}

/// Reading without a scripted response panics.
#[rstest]
#[should_panic]
fn read_unexpected(mut emp_lbk: LoopbackInterface) {
    let _ = emp_lbk.read_budget(1000);
}
