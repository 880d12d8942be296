//! Flags minors in a small table of people, then applies the same transform
//! to a sequence of yearly snapshots.

use statgrad_data::{
    ColumnCondition, ColumnType, ConditionOp, ConditionalReplaceWithDefault, DataError, Schema,
    Transform, Value,
};

fn main() -> Result<(), DataError> {
    let schema = Schema::from_columns([
        ("name", ColumnType::Text),
        ("age", ColumnType::Integer),
        ("minor", ColumnType::Boolean),
    ])?;

    let mut flag_minors = ConditionalReplaceWithDefault::new(
        "minor",
        true,
        false,
        Box::new(ColumnCondition::new("age", ConditionOp::LessThan, 18i64)),
    );
    flag_minors.set_input_schema(&schema)?;
    println!("{}", flag_minors);

    let rows = vec![
        vec![Value::from("ada"), Value::Int(36), Value::Null],
        vec![Value::from("tim"), Value::Int(9), Value::Null],
    ];
    println!("\n--- Rows ---");
    for row in &rows {
        let out = flag_minors.map(row)?;
        println!("{:?} -> {:?}", row, out);
    }

    let snapshots: Vec<Vec<Value>> = (16..=19)
        .map(|age| vec![Value::from("sam"), Value::Int(age), Value::Null])
        .collect();
    println!("\n--- Sequence ---");
    for (step, out) in flag_minors.map_sequence(&snapshots)?.iter().enumerate() {
        println!("step {step}: age={} minor={}", out[1], out[2]);
    }

    Ok(())
}
