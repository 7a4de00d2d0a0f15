use std::collections::HashSet;
use tally_core::{ActionArgs, ArgKey, ContractViolation, EditAction, EditActionKind, EditQuery, IconRef};

#[test]
fn query_ids_are_pairwise_distinct() {
    let ids: HashSet<u32> = EditQuery::all().iter().map(|query| query.id()).collect();
    assert_eq!(ids.len(), EditQuery::all().len());
    assert_eq!(EditQuery::LoadExpense.id(), 1);
    assert_eq!(EditQuery::LoadCategory.id(), 2);
}

#[test]
fn action_ids_are_pairwise_distinct() {
    let ids: HashSet<u32> = EditActionKind::all()
        .iter()
        .map(|action| action.id())
        .collect();
    assert_eq!(ids.len(), EditActionKind::all().len());
    assert_eq!(EditActionKind::all().len(), 6);
    assert!(ids.iter().all(|id| *id > 0));
}

#[test]
fn only_field_edits_declare_required_arguments() {
    for kind in EditActionKind::all() {
        assert_eq!(kind.is_field_edit(), !kind.required_args().is_empty(), "{kind}");
    }
    assert_eq!(
        EditActionKind::CategoryChanged.required_args(),
        &[
            ArgKey::ExpenseCategory,
            ArgKey::ExpenseCategoryId,
            ArgKey::ExpenseCategoryIcon,
        ]
    );
}

#[test]
fn category_change_builds_from_full_argument_bag() {
    let args = ActionArgs::new()
        .with(ArgKey::ExpenseCategory, "Fuel")
        .with(ArgKey::ExpenseCategoryId, 2_i64)
        .with(ArgKey::ExpenseCategoryIcon, "ic_fuel");

    let action = EditAction::from_args(EditActionKind::CategoryChanged, &args).unwrap();

    assert_eq!(
        action,
        EditAction::CategoryChanged {
            category_id: 2,
            category_name: "Fuel".to_string(),
            category_icon: IconRef::new("ic_fuel"),
        }
    );
}

#[test]
fn amount_change_without_amount_is_a_contract_violation() {
    let err = EditAction::from_args(EditActionKind::AmountChanged, &ActionArgs::new()).unwrap_err();
    assert_eq!(
        err,
        ContractViolation::MissingArgument {
            action: EditActionKind::AmountChanged,
            key: ArgKey::ExpenseAmount,
        }
    );
}

#[test]
fn save_and_reload_need_no_arguments() {
    let empty = ActionArgs::new();
    assert_eq!(
        EditAction::from_args(EditActionKind::SaveData, &empty).unwrap(),
        EditAction::SaveData
    );
    assert_eq!(
        EditAction::from_args(EditActionKind::Reload, &empty).unwrap(),
        EditAction::Reload
    );
}

#[test]
fn text_amount_is_rejected_with_expected_type() {
    let args = ActionArgs::new().with(ArgKey::ExpenseAmount, "12");
    let err = EditAction::from_args(EditActionKind::AmountChanged, &args).unwrap_err();
    assert_eq!(
        err,
        ContractViolation::WrongArgumentType {
            action: EditActionKind::AmountChanged,
            key: ArgKey::ExpenseAmount,
            expected: "a number",
        }
    );
}
