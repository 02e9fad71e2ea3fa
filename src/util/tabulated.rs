use crate::StrError;

/// Implements a piecewise-linear function given by a table of (x, y) values
///
/// Outside the table range, the function is extrapolated linearly using the first or last segment.
#[derive(Clone, Debug)]
pub struct Tabulated1d {
    xx: Vec<f64>,
    yy: Vec<f64>,
}

impl Tabulated1d {
    /// Allocates a new instance
    ///
    /// The x values must be strictly increasing.
    pub fn new(xx: &[f64], yy: &[f64]) -> Result<Self, StrError> {
        if xx.len() < 2 {
            return Err("the table must have at least two points");
        }
        if xx.len() != yy.len() {
            return Err("the x and y columns must have the same length");
        }
        for i in 1..xx.len() {
            if xx[i] <= xx[i - 1] {
                return Err("the x values must be strictly increasing");
            }
        }
        Ok(Tabulated1d {
            xx: xx.to_vec(),
            yy: yy.to_vec(),
        })
    }

    /// Returns the index of the segment containing x (or the nearest end segment)
    fn segment(&self, x: f64) -> usize {
        let n = self.xx.len();
        if x <= self.xx[1] {
            return 0;
        }
        if x >= self.xx[n - 2] {
            return n - 2;
        }
        // binary search for xx[i] ≤ x < xx[i+1]
        let (mut lo, mut hi) = (0, n - 1);
        while hi - lo > 1 {
            let mid = (lo + hi) / 2;
            if self.xx[mid] <= x {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        lo
    }

    /// Evaluates the function
    pub fn eval(&self, x: f64) -> f64 {
        let i = self.segment(x);
        let slope = (self.yy[i + 1] - self.yy[i]) / (self.xx[i + 1] - self.xx[i]);
        self.yy[i] + slope * (x - self.xx[i])
    }

    /// Evaluates the derivative of the function
    pub fn deriv(&self, x: f64) -> f64 {
        let i = self.segment(x);
        (self.yy[i + 1] - self.yy[i]) / (self.xx[i + 1] - self.xx[i])
    }

    /// Finds x such that f(x) = y
    ///
    /// The y values must be strictly increasing.
    pub fn inverse(&self, y: f64) -> Result<f64, StrError> {
        let n = self.yy.len();
        for i in 1..n {
            if self.yy[i] <= self.yy[i - 1] {
                return Err("cannot invert the table because y is not strictly increasing");
            }
        }
        let mut i = 0;
        while i < n - 2 && y > self.yy[i + 1] {
            i += 1;
        }
        let slope = (self.yy[i + 1] - self.yy[i]) / (self.xx[i + 1] - self.xx[i]);
        Ok(self.xx[i] + (y - self.yy[i]) / slope)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Tabulated1d;
    use russell_lab::{approx_eq, deriv1_central5};

    #[test]
    fn new_captures_errors() {
        assert_eq!(
            Tabulated1d::new(&[1.0], &[1.0]).err(),
            Some("the table must have at least two points")
        );
        assert_eq!(
            Tabulated1d::new(&[1.0, 2.0], &[1.0]).err(),
            Some("the x and y columns must have the same length")
        );
        assert_eq!(
            Tabulated1d::new(&[1.0, 1.0], &[1.0, 2.0]).err(),
            Some("the x values must be strictly increasing")
        );
    }

    #[test]
    fn eval_and_inverse_work() {
        let f = Tabulated1d::new(&[0.0, 1.0, 3.0, 4.0], &[0.0, 2.0, 3.0, 5.0]).unwrap();
        assert_eq!(f.eval(0.0), 0.0);
        assert_eq!(f.eval(0.5), 1.0);
        assert_eq!(f.eval(2.0), 2.5);
        assert_eq!(f.eval(4.0), 5.0);
        assert_eq!(f.eval(-1.0), -2.0); // extrapolation
        assert_eq!(f.eval(5.0), 7.0); // extrapolation
        for y in [-2.0, 0.5, 2.5, 4.0, 7.0] {
            let x = f.inverse(y).unwrap();
            approx_eq(f.eval(x), y, 1e-14);
        }
        let g = Tabulated1d::new(&[0.0, 1.0], &[1.0, 0.0]).unwrap();
        assert_eq!(
            g.inverse(0.5).err(),
            Some("cannot invert the table because y is not strictly increasing")
        );
    }

    #[test]
    fn deriv_works() {
        let f = Tabulated1d::new(&[0.0, 1.0, 3.0, 4.0], &[0.0, 2.0, 3.0, 5.0]).unwrap();
        let mut args = 0;
        for x in [0.5, 2.0, 3.5] {
            let num = deriv1_central5(x, &mut args, |x, _| Ok(f.eval(x))).unwrap();
            approx_eq(f.deriv(x), num, 1e-10);
        }
    }
}
