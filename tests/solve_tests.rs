//! Solve tests for the modeling core.
//!
//! Test cases are defined as data, then run programmatically.

use cvx_reasoner::prelude::*;

/// Tolerance for comparing floating point results
const TOL: f64 = 1e-4;

/// A test case definition
struct TestCase {
    name: &'static str,
    /// Function that builds the problem and returns (problem, expected_value)
    build: fn() -> (Problem, f64),
}

/// All minimize test cases
fn minimize_test_cases() -> Vec<TestCase> {
    vec![
        // ========== Linear Programs ==========
        TestCase {
            name: "lower_bounds",
            build: || {
                // minimize x + y s.t. x >= 1, y >= 2
                let x = variable();
                let y = variable();
                let prob = Problem::minimize(&x + &y)
                    .subject_to([x.ge(1.0), y.ge(2.0)])
                    .build();
                (prob, 3.0)
            },
        },
        TestCase {
            name: "equality_constraint",
            build: || {
                // minimize 2x s.t. x == 1.5
                let x = variable();
                let prob = Problem::minimize(2.0 * &x)
                    .subject_to([x.equals(&constant(1.5))])
                    .build();
                (prob, 3.0)
            },
        },
        TestCase {
            name: "upper_bounds",
            build: || {
                // minimize -x - y s.t. x <= 3, y <= 1
                let x = variable();
                let y = variable();
                let prob = Problem::minimize(-(&x) - &y)
                    .subject_to([x.le(3.0), y.le(1.0)])
                    .build();
                (prob, -4.0)
            },
        },
        TestCase {
            name: "weighted_sum_offset",
            build: || {
                // minimize 1 + 2x + 3y s.t. x >= 1, y >= 1
                let x = variable();
                let y = variable();
                let prob = Problem::minimize(weighted_sum(1.0, [(2.0, &x), (3.0, &y)]))
                    .subject_to([x.ge(1.0), y.ge(1.0)])
                    .build();
                (prob, 6.0)
            },
        },
        // ========== Hinge (pos) ==========
        TestCase {
            name: "pos_active",
            build: || {
                // minimize max(x - 1, 0) + x s.t. x >= 2
                let x = variable();
                let prob = Problem::minimize(pos(&(&x - 1.0)) + &x)
                    .subject_to([x.ge(2.0)])
                    .build();
                (prob, 3.0)
            },
        },
        TestCase {
            name: "pos_inactive",
            build: || {
                // minimize max(1 - x, 0) s.t. 0 <= x <= 3
                let x = variable();
                let prob = Problem::minimize(pos(&(constant(1.0) - &x)))
                    .subject_to([x.ge(0.0), x.le(3.0)])
                    .build();
                (prob, 0.0)
            },
        },
        TestCase {
            name: "weighted_hinges",
            build: || {
                // minimize 2 max(x - 0.3, 0) + max(0.8 - x, 0) on [0, 1]
                // optimal at x = 0.3 with value 0.5
                let x = variable();
                let objective = sum(vec![
                    2.0 * hinge(&(&x - 0.3), false),
                    hinge(&(constant(0.8) - &x), false),
                ]);
                let prob = Problem::minimize(objective)
                    .subject_to([x.ge(0.0), x.le(1.0)])
                    .build();
                (prob, 0.5)
            },
        },
        // ========== Quadratic ==========
        TestCase {
            name: "square_of_affine",
            build: || {
                // minimize (x - 2)^2 s.t. x <= 1
                let x = variable();
                let prob = Problem::minimize(square(&(&x - 2.0)))
                    .subject_to([x.le(1.0)])
                    .build();
                (prob, 1.0)
            },
        },
        TestCase {
            name: "squared_hinge",
            build: || {
                // minimize max(1 - x, 0)^2 s.t. x <= 0.5
                let x = variable();
                let prob = Problem::minimize(hinge(&(constant(1.0) - &x), true))
                    .subject_to([x.le(0.5)])
                    .build();
                (prob, 0.25)
            },
        },
        TestCase {
            name: "sum_of_squares",
            build: || {
                // minimize x^2 + y^2 s.t. x + y >= 2
                let x = variable();
                let y = variable();
                let prob = Problem::minimize(square(&x) + square(&y))
                    .subject_to([(&x + &y).ge(2.0)])
                    .build();
                (prob, 2.0)
            },
        },
        // ========== Second-order cone ==========
        TestCase {
            name: "square_in_constraint",
            build: || {
                // minimize -x s.t. x^2 <= 4
                let x = variable();
                let prob = Problem::minimize(-1.0 * &x)
                    .subject_to([square(&x).le(4.0)])
                    .build();
                (prob, -2.0)
            },
        },
        TestCase {
            name: "hinge_in_constraint",
            build: || {
                // minimize -x s.t. max(x - 1, 0) <= 0.5
                let x = variable();
                let prob = Problem::minimize(-1.0 * &x)
                    .subject_to([pos(&(&x - 1.0)).le(0.5)])
                    .build();
                (prob, -1.5)
            },
        },
    ]
}

fn infeasible_test_cases() -> Vec<(&'static str, Problem)> {
    vec![
        {
            let x = variable();
            (
                "contradictory_bounds",
                Problem::minimize(x.clone())
                    .subject_to([x.ge(1.0), x.le(0.0)])
                    .build(),
            )
        },
        {
            let x = variable();
            (
                "negative_hinge_bound",
                Problem::minimize(x.clone())
                    .subject_to([pos(&x).le(-1.0)])
                    .build(),
            )
        },
    ]
}

#[test]
fn test_minimize_atoms() {
    for case in minimize_test_cases() {
        let (prob, expected) = (case.build)();

        assert!(prob.is_dcp(), "Problem '{}' should be DCP", case.name);

        let result = prob.solve();
        assert!(result.is_ok(), "Problem '{}' should solve: {:?}", case.name, result.err());
        let solution = result.unwrap();

        assert_eq!(
            solution.status,
            SolveStatus::Optimal,
            "Problem '{}' should be optimal",
            case.name
        );
        let value = solution.value.expect("no value");
        assert!(
            (value - expected).abs() < TOL,
            "Problem '{}': expected {}, got {}",
            case.name,
            expected,
            value
        );
    }
}

#[test]
fn test_infeasible() {
    for (name, prob) in infeasible_test_cases() {
        let result = prob.solve();
        assert!(
            matches!(result, Err(ReasonerError::Infeasible)),
            "Problem '{}' should be infeasible, got {:?}",
            name,
            result
        );
    }
}

#[test]
fn test_unbounded() {
    // minimize x s.t. x <= 1
    let x = variable();
    let result = Problem::minimize(x.clone()).subject_to([x.le(1.0)]).solve();
    assert!(
        matches!(result, Err(ReasonerError::Unbounded)),
        "expected unbounded, got {:?}",
        result
    );
}

#[test]
fn test_primal_values() {
    // minimize (x - 0.25)^2 + max(y - 0.5, 0) + (1 - y) on the unit box
    let x = variable();
    let y = variable();
    let objective = sum(vec![
        square(&(&x - 0.25)),
        pos(&(&y - 0.5)),
        constant(1.0) - &y,
    ]);
    let solution = Problem::minimize(objective)
        .subject_to([x.ge(0.0), x.le(1.0), y.ge(0.0), y.le(1.0)])
        .solve()
        .expect("solve failed");

    let x_val = solution.try_value(&x).unwrap();
    let y_val = solution.try_value(&y).unwrap();
    assert!((x_val - 0.25).abs() < 1e-3, "Expected x=0.25, got {}", x_val);
    // The objective is flat in y on [0.5, 1].
    assert!((0.5 - TOL..=1.0 + TOL).contains(&y_val), "Expected y in [0.5, 1], got {}", y_val);
    assert!((solution.value.unwrap() - 0.5).abs() < TOL);
}

#[test]
fn test_try_value_rejects_non_variables() {
    let x = variable();
    let solution = Problem::minimize(x.clone())
        .subject_to([x.ge(0.0)])
        .solve()
        .unwrap();
    assert!(solution.try_value(&(&x + 1.0)).is_err());
    assert!(solution.try_value(&variable()).is_err());
}

// ============================================================================
// DCP violations
// ============================================================================

#[test]
fn test_minimize_concave_not_dcp() {
    let x = variable();
    let prob = Problem::minimize(-1.0 * pos(&x)).build();
    assert!(!prob.is_dcp(), "minimize(concave) should not be DCP");
    assert!(matches!(prob.solve(), Err(ReasonerError::NotDcp(_))));
}

#[test]
fn test_convex_lower_bound_not_dcp() {
    let x = variable();
    let prob = Problem::minimize(x.clone())
        .subject_to([square(&x).ge(1.0)])
        .build();
    assert!(!prob.is_dcp(), "x^2 >= 1 should not be DCP");
}

#[test]
fn test_composition_violation() {
    // square of a concave expression with unknown sign
    let x = variable();
    let concave = constant(1.0) - pos(&x);
    let prob = Problem::minimize(square(&concave)).build();
    assert!(!prob.is_dcp(), "square(concave) should not be DCP");
}
