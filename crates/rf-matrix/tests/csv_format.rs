use rf_matrix::*;

fn render<T: Coefficient, W: Coefficient>(
    m: &mut Matrix<T, W>,
    options: SaveOptions,
    predicate: &dyn CellPredicate,
) -> String {
    let mut out = Vec::new();
    m.save_to_writer(&mut out, options, predicate).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn all_zero_matrix_writes_nothing() {
    let mut m: Matrix<f64> = Matrix::with_size(2, 2);
    assert_eq!(render(&mut m, SaveOptions::default(), &Identity), "");
}

#[test]
fn all_zero_matrix_with_dimensions() {
    let mut m: Matrix<f64> = Matrix::with_size(2, 2);
    let options = SaveOptions {
        precision: 0,
        print_dimensions: true,
    };
    assert_eq!(render(&mut m, options, &Identity), "size:2x2\n0\t0\n0\t0\n");
}

#[test]
fn whole_values_ignore_precision() {
    let mut m: Matrix<f64> = Matrix::from_row_major(2, 2, &[1.0, 0.0, 0.0, 2.0]);
    assert_eq!(render(&mut m, SaveOptions::default(), &Identity), "1\t0\n0\t2\n");
    assert_eq!(
        render(&mut m, SaveOptions::with_precision(4), &Identity),
        "1\t0\n0\t2\n"
    );
}

#[test]
fn integer_matrix_into_integer_storage() {
    let mut m: Matrix<i32, i32> = Matrix::from_row_major(2, 2, &[1, 0, 0, 2]);
    assert_eq!(
        render(&mut m, SaveOptions::with_precision(4), &Identity),
        "1\t0\n0\t2\n"
    );
}

#[test]
fn integer_matrix_into_float_storage() {
    let mut m: Matrix<i32, f64> = Matrix::from_row_major(2, 2, &[1, 0, 0, 2]);
    assert_eq!(
        render(&mut m, SaveOptions::with_precision(3), &Identity),
        "1\t0\n0\t2\n"
    );
}

#[test]
fn fractional_values_use_exact_precision() {
    let mut m: Matrix<f64> = Matrix::from_row_major(2, 2, &[1.5, 2.44444, 3.66666, 0.0]);
    assert_eq!(
        render(&mut m, SaveOptions::with_precision(3), &Identity),
        "1.500\t2.444\n3.667\t0\n"
    );
}

#[test]
fn integer_storage_truncates_toward_zero() {
    let mut m: Matrix<f64, i32> = Matrix::from_row_major(2, 2, &[1.99, 2.44, -3.999, -1.51]);
    assert_eq!(
        render(&mut m, SaveOptions::with_precision(3), &Identity),
        "1\t2\n-3\t-1\n"
    );
}

#[test]
fn predicate_runs_before_formatting() {
    let mut m: Matrix<f64> = Matrix::from_row_major(2, 2, &[1.0, 0.0, 0.0, 2.0]);
    let plus_one = |v: f64| v + 1.0;
    assert_eq!(
        render(&mut m, SaveOptions::with_precision(2), &plus_one),
        "2\t1\n1\t3\n"
    );
}

#[test]
fn time_series_numbers_wrap_negative_input() {
    let mut m: Matrix<f64, u32> = Matrix::from_row_major(2, 2, &[1.0, -3.0, 0.0, 2.0]);
    assert_eq!(
        render(&mut m, SaveOptions::default(), &TimeSeriesNumbers),
        "2\t4294967294\n1\t3\n"
    );
}

#[test]
fn save_to_file_creates_parent_directories() {
    let dir = std::env::temp_dir().join("rf_matrix_csv_format");
    let _ = std::fs::remove_dir_all(&dir);
    let path = dir.join("nested").join("values.txt");

    let mut m: Matrix<f64> = Matrix::from_row_major(1, 3, &[0.25, 1.0, -2.0]);
    m.save_to_csv_file(&path, SaveOptions::with_precision(2)).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text, "0.25\t1\t-2\n");
}
