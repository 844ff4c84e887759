use crate::config::InterpreterConfig;
use crate::environment::Environment;
use crate::types::{Lambda, Procedure, Value};
use std::cell::RefCell;
use std::collections::HashSet;
use std::io::Write;
use std::rc::Rc;
use thiserror::Error;

// --- Evaluation Error ---
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("'{procedure}' expects {expected} argument(s), got {found}")]
    ArityMismatch {
        procedure: String,
        expected: usize,
        found: usize,
    },
    #[error("'{form}' is missing operand {position}")]
    MissingOperand { form: &'static str, position: usize },
    #[error("cannot evaluate an empty form")]
    EmptyForm,
    #[error("'{form}' expects a symbol, got {found}")]
    NotASymbol { form: &'static str, found: String },
    #[error("expected {expected}, got {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("call depth limit of {limit} exceeded")]
    StackLimitExceeded { limit: usize },
    #[error("failed to write output: {0}")]
    Output(String),
}

/// Problems worth reporting that do not stop evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalWarning {
    #[error("setting undefined variable '{0}'")]
    UndefinedVariable(String),
}

impl From<std::io::Error> for EvalError {
    fn from(err: std::io::Error) -> Self {
        EvalError::Output(err.to_string())
    }
}

// Result type alias for convenience
pub type EvalResult<T = Value> = Result<T, EvalError>;

const SPECIAL_FORMS: [&str; 6] = ["if", "define", "set!", "lambda", "quote", "repeat"];

/// Keywords the evaluator dispatches on before any procedure lookup.
pub fn special_form_identifiers() -> HashSet<String> {
    SPECIAL_FORMS.iter().map(|s| s.to_string()).collect()
}

/// Walks expression trees. Each evaluator owns its own global scope, so
/// independent interpreters never share bindings.
pub struct Evaluator {
    global: Rc<RefCell<Environment>>,
    config: InterpreterConfig,
    depth: usize,
    output: Box<dyn Write>,
}

impl Evaluator {
    pub fn new(config: InterpreterConfig) -> Self {
        Self::with_output(config, Box::new(std::io::stdout()))
    }

    /// Like [`Evaluator::new`] but sends printed output (`repeat` results,
    /// shell echo) to `output`.
    pub fn with_output(config: InterpreterConfig, output: Box<dyn Write>) -> Self {
        Evaluator {
            global: Environment::new_global_populated(),
            config,
            depth: 0,
            output,
        }
    }

    pub fn global(&self) -> Rc<RefCell<Environment>> {
        self.global.clone()
    }

    /// Evaluates a top-level form in the global scope.
    pub fn eval(&mut self, expr: &Value) -> EvalResult {
        let global = self.global.clone();
        self.evaluate(expr, &global)
    }

    /// Writes one line to the evaluator's output.
    pub fn emit(&mut self, line: &str) -> EvalResult<()> {
        writeln!(self.output, "{}", line)?;
        self.output.flush()?;
        Ok(())
    }

    /// Evaluates `expr` within `env`.
    pub fn evaluate(&mut self, expr: &Value, env: &Rc<RefCell<Environment>>) -> EvalResult {
        match expr {
            // Unbound symbols quietly evaluate to nil.
            Value::Symbol(name) => Ok(env.borrow().get(name).unwrap_or(Value::Nil)),
            Value::Number(_) | Value::Procedure(_) | Value::Nil => Ok(expr.clone()),
            Value::List(elements) => self.evaluate_form(elements, env),
        }
    }

    fn evaluate_form(&mut self, elements: &[Value], env: &Rc<RefCell<Environment>>) -> EvalResult {
        let Some((first, rest)) = elements.split_first() else {
            return Err(EvalError::EmptyForm);
        };
        let Value::Symbol(keyword) = first else {
            log::debug!("form head {} is not a symbol, yielding nil", first);
            return Ok(Value::Nil);
        };
        match keyword.as_str() {
            "if" => self.evaluate_if(rest, env),
            "define" => self.evaluate_define(rest, env),
            "set!" => self.evaluate_set(rest, env),
            "lambda" => evaluate_lambda(rest, env),
            "quote" => Ok(operand("quote", rest, 1)?.clone()),
            "repeat" => self.evaluate_repeat(rest, env),
            _ => self.evaluate_application(keyword, rest, env),
        }
    }

    fn evaluate_if(&mut self, operands: &[Value], env: &Rc<RefCell<Environment>>) -> EvalResult {
        let condition = self.evaluate(operand("if", operands, 1)?, env)?;
        // Only the chosen branch is looked at, so `(if 1 x)` is fine.
        let branch = if condition.is_truthy() {
            operand("if", operands, 2)?
        } else {
            operand("if", operands, 3)?
        };
        self.evaluate(branch, env)
    }

    fn evaluate_define(&mut self, operands: &[Value], env: &Rc<RefCell<Environment>>) -> EvalResult {
        let name = symbol_operand("define", operands, 1)?;
        let value = self.evaluate(operand("define", operands, 2)?, env)?;
        env.borrow_mut().define(name.to_string(), value.clone());
        Ok(value)
    }

    fn evaluate_set(&mut self, operands: &[Value], env: &Rc<RefCell<Environment>>) -> EvalResult {
        let name = symbol_operand("set!", operands, 1)?;
        let expr = operand("set!", operands, 2)?;
        if !env.borrow().contains(name) {
            let warning = EvalWarning::UndefinedVariable(name.to_string());
            log::debug!("{:?}", warning);
            self.emit(&format!("WARNING: {}", warning))?;
        }
        let scope = if self.config.set_evaluates_in_global_scope {
            self.global.clone()
        } else {
            env.clone()
        };
        let value = self.evaluate(expr, &scope)?;
        // Binds in the current frame even when an outer frame holds the name.
        env.borrow_mut().define(name.to_string(), value.clone());
        Ok(value)
    }

    fn evaluate_repeat(&mut self, operands: &[Value], env: &Rc<RefCell<Environment>>) -> EvalResult {
        let count = match self.evaluate(operand("repeat", operands, 1)?, env)? {
            Value::Number(n) => n.as_integer().ok_or(EvalError::TypeMismatch {
                expected: "an integer repeat count",
                found: n.type_name(),
            })?,
            other => {
                return Err(EvalError::TypeMismatch {
                    expected: "an integer repeat count",
                    found: other.type_name(),
                });
            }
        };
        let body = operand("repeat", operands, 2)?;
        for _ in 0..count.max(0) {
            let result = self.evaluate(body, env)?;
            self.emit(&result.to_string())?;
        }
        Ok(Value::Nil)
    }

    fn evaluate_application(
        &mut self,
        name: &str,
        operands: &[Value],
        env: &Rc<RefCell<Environment>>,
    ) -> EvalResult {
        let procedure = env.borrow().get(name);

        // Arguments are evaluated even when there is nothing to call.
        let mut args: Vec<Value> = Vec::with_capacity(operands.len());
        for operand_value in operands {
            args.push(self.evaluate(operand_value, env)?);
        }

        match procedure {
            Some(Value::Procedure(procedure)) => self.apply(&procedure, name, args),
            _ => {
                log::debug!("'{}' is not bound to a procedure, yielding nil", name);
                Ok(Value::Nil)
            }
        }
    }

    /// Applies `procedure` (bound to `name`) to already evaluated arguments.
    pub fn apply(&mut self, procedure: &Procedure, name: &str, args: Vec<Value>) -> EvalResult {
        match procedure {
            Procedure::Unary(func, _) => match args.as_slice() {
                [arg] => func(arg),
                _ => Err(arity_error(name, 1, args.len())),
            },
            Procedure::Binary(func, _) => match args.as_slice() {
                [left, right] => func(left, right),
                _ => Err(arity_error(name, 2, args.len())),
            },
            Procedure::Lambda(lambda) => self.apply_lambda(lambda, name, args),
        }
    }

    fn apply_lambda(&mut self, lambda: &Lambda, name: &str, args: Vec<Value>) -> EvalResult {
        if args.len() != lambda.params.len() {
            return Err(arity_error(name, lambda.params.len(), args.len()));
        }
        if let Some(limit) = self.config.max_call_depth {
            if self.depth >= limit {
                return Err(EvalError::StackLimitExceeded { limit });
            }
        }
        log::trace!("calling '{}' at depth {}", name, self.depth);

        // Parent is the defining scope, which gives lexical scoping.
        let call_env = Environment::new_enclosed(lambda.env.clone());
        {
            let mut frame = call_env.borrow_mut();
            for (param, arg) in lambda.params.iter().zip(args) {
                frame.define(param.clone(), arg);
            }
        }

        self.depth += 1;
        let result = self.evaluate(&lambda.body, &call_env);
        self.depth -= 1;
        result
    }
}

fn evaluate_lambda(operands: &[Value], env: &Rc<RefCell<Environment>>) -> EvalResult {
    let params = match operand("lambda", operands, 1)? {
        Value::List(params) => params
            .iter()
            .map(|param| match param {
                Value::Symbol(name) => Ok(name.clone()),
                other => Err(EvalError::NotASymbol {
                    form: "lambda",
                    found: other.to_string(),
                }),
            })
            .collect::<EvalResult<Vec<String>>>()?,
        other => {
            return Err(EvalError::TypeMismatch {
                expected: "a parameter list",
                found: other.type_name(),
            });
        }
    };
    let body = operand("lambda", operands, 2)?.clone();
    Ok(Value::Procedure(Procedure::Lambda(Rc::new(Lambda {
        params,
        body,
        env: env.clone(),
    }))))
}

/// The `position`th operand of a special form (1-based, after the keyword).
/// Extra operands are ignored.
fn operand<'a>(form: &'static str, operands: &'a [Value], position: usize) -> EvalResult<&'a Value> {
    operands
        .get(position - 1)
        .ok_or(EvalError::MissingOperand { form, position })
}

fn symbol_operand<'a>(
    form: &'static str,
    operands: &'a [Value],
    position: usize,
) -> EvalResult<&'a str> {
    let value = operand(form, operands, position)?;
    value.as_symbol().ok_or_else(|| EvalError::NotASymbol {
        form,
        found: value.to_string(),
    })
}

fn arity_error(name: &str, expected: usize, found: usize) -> EvalError {
    EvalError::ArityMismatch {
        procedure: name.to_string(),
        expected,
        found,
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::Number;
    use crate::parser::parse_str; // Use parser to create expressions easily

    // Shared buffer so tests can read back what the evaluator printed.
    #[derive(Clone, Default)]
    struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    fn evaluator() -> Evaluator {
        Evaluator::with_output(InterpreterConfig::default(), Box::new(std::io::sink()))
    }

    fn eval_str(ev: &mut Evaluator, input: &str) -> EvalResult {
        match parse_str(input) {
            Ok(expr) => ev.eval(&expr),
            Err(e) => panic!("Parsing failed for input '{}': {}", input, e),
        }
    }

    // Helper to evaluate input in a fresh evaluator and check the result
    fn assert_eval(input: &str, expected: Value) {
        let mut ev = evaluator();
        match eval_str(&mut ev, input) {
            Ok(result) => assert_eq!(result, expected, "Input: '{}'", input),
            Err(e) => panic!("Evaluation failed for input '{}': {}", input, e),
        }
    }

    // Helper to assert evaluation errors
    fn assert_eval_error(ev: &mut Evaluator, input: &str, expected: EvalError) {
        match eval_str(ev, input) {
            Ok(result) => panic!(
                "Expected evaluation to fail for input '{}', but got: {:?}",
                input, result
            ),
            Err(e) => assert_eq!(e, expected, "Input: '{}'", input),
        }
    }

    fn int(n: i32) -> Value {
        Value::int(n)
    }

    #[test]
    fn test_eval_self_evaluating() {
        assert_eval("123", int(123));
        assert_eval("-4.5", Value::Number(Number::Float(-4.5)));
    }

    #[test]
    fn test_eval_symbol_lookup() {
        assert_eval("pi", Value::Number(Number::Double(std::f64::consts::PI)));
        assert_eval("undefined-thing", Value::Nil);
    }

    #[test]
    fn test_eval_arithmetic() {
        assert_eval("(+ 1 2)", int(3));
        assert_eval("(* 2 (+ 3 4))", int(14));
        assert_eval("(abs -7)", int(7));
        assert_eval("(+ 1.0 2)", Value::Number(Number::Float(3.0)));
        assert_eval("(* pi 1)", Value::Number(Number::Double(std::f64::consts::PI)));
        let mut ev = evaluator();
        assert_eq!(eval_str(&mut ev, "(+ 1.0 2)").unwrap().to_string(), "3.0");
    }

    #[test]
    fn test_eval_if() {
        assert_eval("(if 0 1 2)", int(2));
        assert_eval("(if 1 1 2)", int(1));
        assert_eval("(if -3 1 2)", int(1));
        // Only the integer zero is false.
        assert_eval("(if 0.0 1 2)", int(1));
        assert_eval("(if (quote ()) 1 2)", int(1));
        assert_eval("(if undefined 1 2)", int(1));
        assert_eval("(if (+ -1 1) 1 2)", int(2));
    }

    #[test]
    fn test_eval_if_is_lazy() {
        let mut ev = evaluator();
        eval_str(&mut ev, "(if 1 (define a 1) (define b 2))").unwrap();
        assert_eq!(ev.global().borrow().get("a"), Some(int(1)));
        assert_eq!(ev.global().borrow().get("b"), None);
        // The unused branch may even be missing.
        assert_eq!(eval_str(&mut ev, "(if 1 5)"), Ok(int(5)));
        assert_eval_error(
            &mut ev,
            "(if 0 5)",
            EvalError::MissingOperand {
                form: "if",
                position: 3,
            },
        );
    }

    #[test]
    fn test_eval_define() {
        let mut ev = evaluator();
        assert_eq!(eval_str(&mut ev, "(define x (+ 2 3))"), Ok(int(5)));
        assert_eq!(eval_str(&mut ev, "x"), Ok(int(5)));
        assert_eq!(eval_str(&mut ev, "(define x 6)"), Ok(int(6)));
        assert_eq!(eval_str(&mut ev, "(* x x)"), Ok(int(36)));
        assert_eval_error(
            &mut ev,
            "(define 1 2)",
            EvalError::NotASymbol {
                form: "define",
                found: "1".to_string(),
            },
        );
    }

    #[test]
    fn test_eval_lambda_and_application() {
        let mut ev = evaluator();
        eval_str(&mut ev, "(define sq (lambda (x) (* x x)))").unwrap();
        assert_eq!(eval_str(&mut ev, "(sq 5)"), Ok(int(25)));
        assert_eq!(eval_str(&mut ev, "(sq (sq 2))"), Ok(int(16)));
        // The binding persists for later top-level forms.
        assert!(matches!(
            ev.global().borrow().get("sq"),
            Some(Value::Procedure(Procedure::Lambda(_)))
        ));
        eval_str(&mut ev, "(define zero (lambda () 0))").unwrap();
        assert_eq!(eval_str(&mut ev, "(zero)"), Ok(int(0)));
    }

    #[test]
    fn test_eval_lexical_scoping() {
        let mut ev = evaluator();
        eval_str(&mut ev, "(define n 10)").unwrap();
        eval_str(&mut ev, "(define add-n (lambda (x) (+ x n)))").unwrap();
        // `n` inside add-n resolves in the defining scope, not the caller's.
        eval_str(&mut ev, "(define call (lambda (n) (add-n 1)))").unwrap();
        assert_eq!(eval_str(&mut ev, "(call 100)"), Ok(int(11)));

        eval_str(&mut ev, "(define adder (lambda (a) (lambda (b) (+ a b))))").unwrap();
        eval_str(&mut ev, "(define add5 (adder 5))").unwrap();
        assert_eq!(eval_str(&mut ev, "(add5 3)"), Ok(int(8)));
        // Parameters never leak into the global scope.
        assert_eq!(ev.global().borrow().get("a"), None);
    }

    #[test]
    fn test_eval_recursion() {
        let mut ev = evaluator();
        eval_str(
            &mut ev,
            "(define sum (lambda (n) (if n (+ n (sum (+ n -1))) 0)))",
        )
        .unwrap();
        assert_eq!(eval_str(&mut ev, "(sum 10)"), Ok(int(55)));
    }

    #[test]
    fn test_eval_quote() {
        assert_eval(
            "(quote (1 2 3))",
            Value::List(vec![int(1), int(2), int(3)]),
        );
        assert_eval(
            "(quote (undefined-proc (+ 1 2)))",
            Value::List(vec![
                Value::symbol("undefined-proc"),
                Value::List(vec![Value::symbol("+"), int(1), int(2)]),
            ]),
        );
        assert_eval("(quote x)", Value::symbol("x"));
    }

    #[test]
    fn test_eval_repeat() {
        let buffer = SharedBuffer::default();
        let mut ev =
            Evaluator::with_output(InterpreterConfig::default(), Box::new(buffer.clone()));
        assert_eq!(eval_str(&mut ev, "(repeat 3 (+ 1 1))"), Ok(Value::Nil));
        assert_eq!(buffer.contents(), "2\n2\n2\n");
    }

    #[test]
    fn test_eval_repeat_shares_environment() {
        let buffer = SharedBuffer::default();
        let mut ev =
            Evaluator::with_output(InterpreterConfig::default(), Box::new(buffer.clone()));
        eval_str(&mut ev, "(define i 0)").unwrap();
        eval_str(&mut ev, "(repeat (+ 1 2) (define i (+ i 1)))").unwrap();
        assert_eq!(buffer.contents(), "1\n2\n3\n");
        assert_eq!(eval_str(&mut ev, "i"), Ok(int(3)));
        // Zero or negative counts run nothing.
        eval_str(&mut ev, "(repeat -2 (define i 100))").unwrap();
        assert_eq!(eval_str(&mut ev, "i"), Ok(int(3)));
        assert_eval_error(
            &mut ev,
            "(repeat 1.5 i)",
            EvalError::TypeMismatch {
                expected: "an integer repeat count",
                found: "float",
            },
        );
    }

    #[test]
    fn test_eval_set_on_defined_variable() {
        let mut ev = evaluator();
        eval_str(&mut ev, "(define x 1)").unwrap();
        assert_eq!(eval_str(&mut ev, "(set! x (+ x 1))"), Ok(int(2)));
        assert_eq!(eval_str(&mut ev, "x"), Ok(int(2)));
    }

    #[test]
    fn test_eval_set_on_undefined_variable_still_binds() {
        let mut ev = evaluator();
        assert_eq!(eval_str(&mut ev, "(set! fresh 9)"), Ok(int(9)));
        assert_eq!(eval_str(&mut ev, "fresh"), Ok(int(9)));
    }

    #[test]
    fn test_eval_set_warns_only_for_unbound_names() {
        let buffer = SharedBuffer::default();
        let mut ev = Evaluator::with_output(InterpreterConfig::default(), Box::new(buffer.clone()));
        eval_str(&mut ev, "(set! fresh 9)").unwrap();
        assert_eq!(
            buffer.contents(),
            "WARNING: setting undefined variable 'fresh'\n"
        );

        // `fresh` is bound now, and so is everything in the global scope.
        eval_str(&mut ev, "(set! fresh 10)").unwrap();
        eval_str(&mut ev, "(set! pi 3)").unwrap();
        assert_eq!(
            buffer.contents(),
            "WARNING: setting undefined variable 'fresh'\n"
        );
    }

    #[test]
    fn test_eval_set_rhs_uses_global_scope_by_default() {
        let mut ev = evaluator();
        eval_str(&mut ev, "(define y 1)").unwrap();
        // Inside the call, `y` on the right-hand side is read globally, so
        // the parameter is ignored; the result is bound in the call frame.
        eval_str(&mut ev, "(define f (lambda (y) (set! y (+ y 10))))").unwrap();
        assert_eq!(eval_str(&mut ev, "(f 100)"), Ok(int(11)));
        assert_eq!(eval_str(&mut ev, "y"), Ok(int(1)));
    }

    #[test]
    fn test_eval_set_rhs_in_current_scope_when_configured() {
        let config = InterpreterConfig {
            set_evaluates_in_global_scope: false,
            ..InterpreterConfig::default()
        };
        let mut ev = Evaluator::with_output(config, Box::new(std::io::sink()));
        eval_str(&mut ev, "(define y 1)").unwrap();
        eval_str(&mut ev, "(define f (lambda (y) (set! y (+ y 10))))").unwrap();
        assert_eq!(eval_str(&mut ev, "(f 100)"), Ok(int(110)));
        assert_eq!(eval_str(&mut ev, "y"), Ok(int(1)));
    }

    #[test]
    fn test_eval_set_binds_in_current_frame() {
        let mut ev = evaluator();
        eval_str(&mut ev, "(define counter 0)").unwrap();
        eval_str(&mut ev, "(define bump (lambda () (set! counter 5)))").unwrap();
        assert_eq!(eval_str(&mut ev, "(bump)"), Ok(int(5)));
        // The global binding is shadowed in the call frame, not updated.
        assert_eq!(eval_str(&mut ev, "counter"), Ok(int(0)));
    }

    #[test]
    fn test_eval_unbound_procedure_is_nil() {
        let mut ev = evaluator();
        assert_eq!(eval_str(&mut ev, "(nothing 1 2)"), Ok(Value::Nil));
        // Arguments still run for their side effects.
        assert_eq!(eval_str(&mut ev, "(nothing (define z 4))"), Ok(Value::Nil));
        assert_eq!(eval_str(&mut ev, "z"), Ok(int(4)));
        // A bound non-procedure behaves the same way.
        assert_eq!(eval_str(&mut ev, "(z 1)"), Ok(Value::Nil));
        assert_eq!(eval_str(&mut ev, "(1 2 3)"), Ok(Value::Nil));
    }

    #[test]
    fn test_eval_arity_mismatch() {
        let mut ev = evaluator();
        assert_eval_error(
            &mut ev,
            "(+ 1)",
            EvalError::ArityMismatch {
                procedure: "+".to_string(),
                expected: 2,
                found: 1,
            },
        );
        assert_eval_error(
            &mut ev,
            "(abs 1 2)",
            EvalError::ArityMismatch {
                procedure: "abs".to_string(),
                expected: 1,
                found: 2,
            },
        );
        eval_str(&mut ev, "(define sq (lambda (x) (* x x)))").unwrap();
        assert_eval_error(
            &mut ev,
            "(sq)",
            EvalError::ArityMismatch {
                procedure: "sq".to_string(),
                expected: 1,
                found: 0,
            },
        );
        assert_eval_error(
            &mut ev,
            "(sq 1 2)",
            EvalError::ArityMismatch {
                procedure: "sq".to_string(),
                expected: 1,
                found: 2,
            },
        );
    }

    #[test]
    fn test_eval_malformed_forms() {
        let mut ev = evaluator();
        assert_eval_error(&mut ev, "()", EvalError::EmptyForm);
        assert_eval_error(
            &mut ev,
            "(quote)",
            EvalError::MissingOperand {
                form: "quote",
                position: 1,
            },
        );
        assert_eval_error(
            &mut ev,
            "(define x)",
            EvalError::MissingOperand {
                form: "define",
                position: 2,
            },
        );
        assert_eval_error(
            &mut ev,
            "(lambda x x)",
            EvalError::TypeMismatch {
                expected: "a parameter list",
                found: "symbol",
            },
        );
        assert_eval_error(
            &mut ev,
            "(lambda (x 1) x)",
            EvalError::NotASymbol {
                form: "lambda",
                found: "1".to_string(),
            },
        );
        assert_eval_error(
            &mut ev,
            "(+ 1 (quote a))",
            EvalError::TypeMismatch {
                expected: "a number for '+'",
                found: "symbol",
            },
        );
    }

    #[test]
    fn test_eval_stack_limit() {
        let config = InterpreterConfig {
            max_call_depth: Some(16),
            ..InterpreterConfig::default()
        };
        let mut ev = Evaluator::with_output(config, Box::new(std::io::sink()));
        eval_str(&mut ev, "(define loop (lambda (x) (loop x)))").unwrap();
        assert_eval_error(
            &mut ev,
            "(loop 1)",
            EvalError::StackLimitExceeded { limit: 16 },
        );
        // Depth unwinds after the failure, so bounded recursion still works.
        eval_str(
            &mut ev,
            "(define count (lambda (n) (if n (count (+ n -1)) 0)))",
        )
        .unwrap();
        assert_eq!(eval_str(&mut ev, "(count 15)"), Ok(int(0)));
    }

    #[test]
    fn test_eval_deep_recursion_unbounded_by_default() {
        // Unoptimised frames are large, so the recursion gets its own stack.
        let handle = std::thread::Builder::new()
            .stack_size(64 * 1024 * 1024)
            .spawn(|| {
                let mut ev = evaluator();
                eval_str(
                    &mut ev,
                    "(define sum (lambda (n) (if n (+ n (sum (+ n -1))) 0)))",
                )
                .unwrap();
                eval_str(&mut ev, "(sum 1000)").map(|value| value.to_string())
            })
            .unwrap();
        assert_eq!(handle.join().unwrap(), Ok("500500".to_string()));
    }

    #[test]
    fn test_independent_evaluators() {
        let mut first = evaluator();
        let mut second = evaluator();
        eval_str(&mut first, "(define only-here 1)").unwrap();
        assert_eq!(eval_str(&mut second, "only-here"), Ok(Value::Nil));
    }

    #[test]
    fn test_special_form_identifiers() {
        let ids = special_form_identifiers();
        assert_eq!(ids.len(), 6);
        assert!(ids.contains("set!"));
        assert!(ids.contains("repeat"));
    }
}
