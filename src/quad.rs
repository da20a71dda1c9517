// Copyright 2017-2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

/*! Adaptive Gauss-Kronrod quadrature.

This is a small native implementation of the QUADPACK `QAG` and `QAGIU`
routines, exposed through a builder interface:

```
use nonthermal::quad::IntegrationWorkspace;

let mut ws = IntegrationWorkspace::new(100);
let r = ws.qag(|x| x.cos(), 0., 0.5 * std::f64::consts::PI)
    .tolerance(0., 1e-8)
    .compute()
    .unwrap();
assert!((r.value - 1.).abs() < 1e-8);
```

Failure to converge is reported as an error, but the error carries the best
estimate that was reached, so callers that would rather degrade than abort
can still get at a number.

*/

use std::f64;
use thiserror::Error;


// Abscissae and weights of the 15-point Kronrod rule and its embedded 7-point
// Gauss rule. The last abscissa is the center of the interval.

const XGK15: [f64; 8] = [
    0.991455371120812639206854697526329,
    0.949107912342758524526189684047851,
    0.864864423359769072789712788640926,
    0.741531185599394439863864773280788,
    0.586087235467691130294144845693013,
    0.405845151377397166906606412076961,
    0.207784955007898467600689403773245,
    0.000000000000000000000000000000000,
];

const WGK15: [f64; 8] = [
    0.022935322010529224963732008058970,
    0.063092092629978553290700663189204,
    0.104790010322250183839876322541518,
    0.140653259715525918745189590510238,
    0.169004726639267902826583426598550,
    0.190350578064785409913256402421014,
    0.204432940075298892414161999234649,
    0.209482141084727828012999174891714,
];

const WG7: [f64; 4] = [
    0.129484966168869693270611432679082,
    0.279705391489276667901467771423780,
    0.381830050505118944950369775488975,
    0.417959183673469387755102040816327,
];

// 21-point Kronrod and embedded 10-point Gauss. The Gauss rule has no center
// node here.

const XGK21: [f64; 11] = [
    0.995657163025808080735527280689003,
    0.973906528517171720077964012084452,
    0.930157491355708226001207180059508,
    0.865063366688984510732096688423493,
    0.780817726586416897063717578345042,
    0.679409568299024406234327365114874,
    0.562757134668604683339000099272694,
    0.433395394129247190799265943165784,
    0.294392862701460198131126603103866,
    0.148874338981631210884826001129720,
    0.000000000000000000000000000000000,
];

const WGK21: [f64; 11] = [
    0.011694638867371874278064396062192,
    0.032558162307964727478818972459390,
    0.054755896574351996031381300244580,
    0.075039674810919952767043140916190,
    0.093125454583697605535065465083366,
    0.109387158802297641899210590325805,
    0.123491976262065851077208931238247,
    0.134709217311473325928054001771707,
    0.142775938577060080797094273138717,
    0.147739104901338491374841515972068,
    0.149445554002916905664936468389821,
];

const WG10: [f64; 5] = [
    0.066671344308688137593568809893332,
    0.149451349150580593145776339657697,
    0.219086362515982043995534934228163,
    0.269266719309996355091226921569469,
    0.295524224714752870173892994651338,
];


/// Which Gauss-Kronrod pair to use on each subinterval.
#[derive(Clone,Copy,Debug,Eq,PartialEq)]
pub enum IntegrationRule {
    /// 15-point Kronrod rule with an embedded 7-point Gauss rule.
    GaussKonrod15,

    /// 21-point Kronrod rule with an embedded 10-point Gauss rule.
    GaussKonrod21,
}

impl IntegrationRule {
    fn tables(self) -> (&'static [f64], &'static [f64], &'static [f64]) {
        match self {
            IntegrationRule::GaussKonrod15 => (&XGK15, &WGK15, &WG7),
            IntegrationRule::GaussKonrod21 => (&XGK21, &WGK21, &WG10),
        }
    }
}


#[derive(Clone,Copy,Debug,Eq,PartialEq)]
enum Integrator {
    QAG,
    QAGIU,
}


/// The outcome of a successful integration.
#[derive(Clone,Copy,Debug,PartialEq)]
pub struct IntegrationResult {
    /// The integral.
    pub value: f64,

    /// The estimated absolute error.
    pub abserr: f64,
}


/// Why an integration did not meet its tolerance.
#[derive(Clone,Copy,Debug,Error,PartialEq)]
pub enum IntegrationError {
    /// The workspace ran out of subintervals.
    #[error("maximum number of subdivisions ({limit}) reached")]
    SubdivisionLimit {
        /// The size of the workspace.
        limit: usize,
        /// Where the integration had gotten to.
        estimate: IntegrationResult,
    },

    /// A subinterval became too small to split further.
    #[error("roundoff error prevents the requested tolerance from being reached")]
    Roundoff {
        /// Where the integration had gotten to.
        estimate: IntegrationResult,
    },

    /// The integrand returned a NaN or infinity.
    #[error("integrand is not finite")]
    NonFinite,

    /// The tolerances cannot be reached in double precision.
    #[error("invalid tolerances epsabs={epsabs:e}, epsrel={epsrel:e}")]
    BadTolerance {
        /// Requested absolute tolerance.
        epsabs: f64,
        /// Requested relative tolerance.
        epsrel: f64,
    },
}

impl IntegrationError {
    /// The best estimate that was available when the integration gave up,
    /// if there is a meaningful one.
    pub fn estimate(&self) -> Option<IntegrationResult> {
        match *self {
            IntegrationError::SubdivisionLimit { estimate, .. } => Some(estimate),
            IntegrationError::Roundoff { estimate } => Some(estimate),
            _ => None,
        }
    }
}


#[derive(Clone,Copy,Debug,PartialEq)]
struct Segment {
    a: f64,
    b: f64,
    value: f64,
    abserr: f64,
}


/// Scratch space for the adaptive integrators. The capacity bounds the
/// number of subintervals that will be used.
#[derive(Clone,Debug)]
pub struct IntegrationWorkspace {
    limit: usize,
    segments: Vec<Segment>,
}

impl IntegrationWorkspace {
    /// Create a workspace that will use at most `limit` subintervals.
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);

        IntegrationWorkspace {
            limit,
            segments: Vec::with_capacity(limit),
        }
    }

    /// Set up integration over the finite interval `[lower_bound, upper_bound]`.
    pub fn qag<F>(&mut self, f: F, lower_bound: f64, upper_bound: f64) -> IntegrationBuilder<'_, F>
        where F: FnMut(f64) -> f64
    {
        IntegrationBuilder::new(self, f, Integrator::QAG, lower_bound, upper_bound)
    }

    /// Set up integration over the semi-infinite interval `[lower_bound, inf)`.
    pub fn qagiu<F>(&mut self, f: F, lower_bound: f64) -> IntegrationBuilder<'_, F>
        where F: FnMut(f64) -> f64
    {
        IntegrationBuilder::new(self, f, Integrator::QAGIU, lower_bound, f64::INFINITY)
    }
}


/// A pending integration. Configure it and then call `compute()`.
pub struct IntegrationBuilder<'a, F> where F: FnMut(f64) -> f64 {
    workspace: &'a mut IntegrationWorkspace,
    function: F,
    kind: Integrator,
    rule: IntegrationRule,
    lower_bound: f64,
    upper_bound: f64,
    epsabs: f64,
    epsrel: f64,
}

impl<'a, F> IntegrationBuilder<'a, F> where F: FnMut(f64) -> f64 {
    fn new(ws: &'a mut IntegrationWorkspace, f: F, kind: Integrator,
           lower: f64, upper: f64) -> Self {
        IntegrationBuilder {
            workspace: ws,
            function: f,
            kind,
            rule: IntegrationRule::GaussKonrod21,
            lower_bound: lower,
            upper_bound: upper,
            epsabs: 0.,
            epsrel: 1e-6,
        }
    }

    /// Set the absolute and relative tolerances. The integration stops once
    /// the error estimate is below either one.
    pub fn tolerance(mut self, epsabs: f64, epsrel: f64) -> Self {
        self.epsabs = epsabs;
        self.epsrel = epsrel;
        self
    }

    /// Choose the Gauss-Kronrod pair.
    pub fn rule(mut self, rule: IntegrationRule) -> Self {
        self.rule = rule;
        self
    }

    /// Do the integration.
    pub fn compute(self) -> Result<IntegrationResult, IntegrationError> {
        let IntegrationBuilder {
            workspace, mut function, kind, rule, lower_bound, upper_bound, epsabs, epsrel
        } = self;

        if !(epsabs > 0.) && !(epsrel >= 50. * f64::EPSILON) {
            return Err(IntegrationError::BadTolerance { epsabs, epsrel });
        }

        match kind {
            Integrator::QAG => {
                adapt(workspace, &mut function, lower_bound, upper_bound, rule, epsabs, epsrel)
            },
            Integrator::QAGIU => {
                // x = a + (1 - t) / t maps (0, 1] onto [a, inf).
                let mut transformed = |t: f64| {
                    let x = lower_bound + (1. - t) / t;
                    function(x) / (t * t)
                };
                adapt(workspace, &mut transformed, 0., 1., rule, epsabs, epsrel)
            },
        }
    }
}


/// Apply one Gauss-Kronrod rule to `[a, b]`, with the QUADPACK error
/// estimate.
fn kronrod<G>(g: &mut G, a: f64, b: f64, rule: IntegrationRule) -> Segment
    where G: FnMut(f64) -> f64
{
    let (xgk, wgk, wg) = rule.tables();
    let n = xgk.len() - 1;
    let center = 0.5 * (a + b);
    let half_length = 0.5 * (b - a);

    let f_center = g(center);
    let mut res_kronrod = f_center * wgk[n];
    let mut res_gauss = if wg.len() * 2 > n { f_center * wg[wg.len() - 1] } else { 0. };
    let mut res_abs = res_kronrod.abs();

    let mut fv1 = [0_f64; 10];
    let mut fv2 = [0_f64; 10];

    for j in 0..n {
        let dx = half_length * xgk[j];
        let f1 = g(center - dx);
        let f2 = g(center + dx);
        fv1[j] = f1;
        fv2[j] = f2;
        res_kronrod += wgk[j] * (f1 + f2);
        res_abs += wgk[j] * (f1.abs() + f2.abs());

        if j % 2 == 1 {
            res_gauss += wg[j / 2] * (f1 + f2);
        }
    }

    let mean = 0.5 * res_kronrod;
    let mut res_asc = wgk[n] * (f_center - mean).abs();

    for j in 0..n {
        res_asc += wgk[j] * ((fv1[j] - mean).abs() + (fv2[j] - mean).abs());
    }

    let value = res_kronrod * half_length;
    let res_abs = res_abs * half_length.abs();
    let res_asc = res_asc * half_length.abs();
    let mut abserr = ((res_kronrod - res_gauss) * half_length).abs();

    if res_asc != 0. && abserr != 0. {
        abserr = res_asc * (200. * abserr / res_asc).powf(1.5).min(1.);
    }

    if res_abs > f64::MIN_POSITIVE / (50. * f64::EPSILON) {
        abserr = abserr.max(50. * f64::EPSILON * res_abs);
    }

    Segment { a, b, value, abserr }
}


fn adapt<G>(ws: &mut IntegrationWorkspace, g: &mut G, a: f64, b: f64, rule: IntegrationRule,
            epsabs: f64, epsrel: f64) -> Result<IntegrationResult, IntegrationError>
    where G: FnMut(f64) -> f64
{
    ws.segments.clear();

    let first = kronrod(g, a, b, rule);

    if !first.value.is_finite() {
        return Err(IntegrationError::NonFinite);
    }

    ws.segments.push(first);
    let mut value = first.value;
    let mut abserr = first.abserr;

    while abserr > epsabs.max(epsrel * value.abs()) {
        let estimate = IntegrationResult { value, abserr };

        if ws.segments.len() >= ws.limit {
            return Err(IntegrationError::SubdivisionLimit { limit: ws.limit, estimate });
        }

        let mut worst = 0;

        for (i, s) in ws.segments.iter().enumerate() {
            if s.abserr > ws.segments[worst].abserr {
                worst = i;
            }
        }

        let s = ws.segments.swap_remove(worst);
        let mid = 0.5 * (s.a + s.b);

        if !(mid > s.a.min(s.b) && mid < s.a.max(s.b)) {
            ws.segments.push(s);
            return Err(IntegrationError::Roundoff { estimate });
        }

        let left = kronrod(g, s.a, mid, rule);
        let right = kronrod(g, mid, s.b, rule);

        if !(left.value.is_finite() && right.value.is_finite()) {
            return Err(IntegrationError::NonFinite);
        }

        ws.segments.push(left);
        ws.segments.push(right);

        value = ws.segments.iter().map(|s| s.value).sum();
        abserr = ws.segments.iter().map(|s| s.abserr).sum();
    }

    Ok(IntegrationResult { value, abserr })
}


#[cfg(test)]
mod tests {
    use std::f64::consts::PI;
    use super::*;

    #[test]
    fn polynomials_are_exact() {
        let mut ws = IntegrationWorkspace::new(10);

        for &rule in &[IntegrationRule::GaussKonrod15, IntegrationRule::GaussKonrod21] {
            let r = ws.qag(|x| 3. * x * x - 2. * x + 1., -1., 2.)
                .rule(rule)
                .tolerance(0., 1e-12)
                .compute()
                .unwrap();
            assert_approx_eq!(r.value, 9., 1e-12);
        }
    }

    #[test]
    fn cosine_powers() {
        let mut ws = IntegrationWorkspace::new(1024);

        for i in 1..6 {
            let r = ws.qag(|x: f64| x.cos().powi(i), 0., 0.5 * PI)
                .tolerance(0., 1e-10)
                .compute()
                .unwrap();

            // Wallis' integrals.
            let expected = match i {
                1 => 1.,
                2 => 0.25 * PI,
                3 => 2. / 3.,
                4 => 3. * PI / 16.,
                _ => 8. / 15.,
            };
            assert_approx_eq!(r.value, expected, 1e-9);
        }
    }

    #[test]
    fn peaked_integrand_needs_subdivision() {
        let mut ws = IntegrationWorkspace::new(200);
        let r = ws.qag(|x: f64| 1. / (1e-4 + x * x), -1., 1.)
            .tolerance(0., 1e-8)
            .compute()
            .unwrap();
        let expected = 2. * (1. / 1e-2_f64).atan() / 1e-2;
        assert_approx_eq!(r.value / expected, 1., 1e-8);
    }

    #[test]
    fn semi_infinite() {
        let mut ws = IntegrationWorkspace::new(200);
        let r = ws.qagiu(|x| x.powi(-2), 1.)
            .tolerance(0., 1e-8)
            .compute()
            .unwrap();
        assert_approx_eq!(r.value, 1., 1e-8);

        let r = ws.qagiu(|x: f64| (-x).exp(), 0.)
            .tolerance(0., 1e-8)
            .compute()
            .unwrap();
        assert_approx_eq!(r.value, 1., 1e-8);
    }

    #[test]
    fn reversed_bounds_flip_sign() {
        let mut ws = IntegrationWorkspace::new(50);
        let r = ws.qag(|x| x, 2., 0.).compute().unwrap();
        assert_approx_eq!(r.value, -2., 1e-12);
    }

    #[test]
    fn exhausted_workspace_keeps_estimate() {
        let mut ws = IntegrationWorkspace::new(2);
        let err = ws.qag(|x: f64| x.sqrt().recip(), 0., 1.)
            .tolerance(0., 1e-12)
            .compute()
            .unwrap_err();
        let est = err.estimate().unwrap();
        assert!(est.value > 0.);
        assert!(matches!(err, IntegrationError::SubdivisionLimit { limit: 2, .. }));
    }

    #[test]
    fn non_finite_integrand() {
        let mut ws = IntegrationWorkspace::new(50);
        let err = ws.qag(|_| f64::NAN, 0., 1.).compute().unwrap_err();
        assert_eq!(err, IntegrationError::NonFinite);
        assert!(err.estimate().is_none());
    }

    #[test]
    fn bad_tolerance() {
        let mut ws = IntegrationWorkspace::new(50);
        let err = ws.qag(|x| x, 0., 1.).tolerance(0., 0.).compute().unwrap_err();
        assert!(matches!(err, IntegrationError::BadTolerance { .. }));
    }
}
