use std::fmt;

/// Factory calibration coefficients, sign-corrected and widened to `f64`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CalibrationCoefficients {
    pub c0: f64,
    pub c1: f64,
    pub c00: f64,
    pub c10: f64,
    pub c01: f64,
    pub c11: f64,
    pub c20: f64,
    pub c21: f64,
    pub c30: f64,
}

/// Latest compensated values. Temperature in degrees Celsius, pressure in Pa.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Readings {
    pub temperature: f64,
    pub pressure: f64,
}

/// Raw readings normalised by their fixed divisors.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Scaled {
    pub tsc: f64,
    pub psc: f64,
}

/// Snapshot of the driver's internals for debugging.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Diagnostics {
    pub coefficients: CalibrationCoefficients,
    pub raw_temperature: i32,
    pub raw_pressure: i32,
    pub scaled: Scaled,
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let c = &self.coefficients;
        writeln!(f, "---------------")?;
        writeln!(f, "C0= {}", c.c0)?;
        writeln!(f, "C1= {}", c.c1)?;
        writeln!(f, "C00= {}", c.c00)?;
        writeln!(f, "C10= {}", c.c10)?;
        writeln!(f, "C01= {}", c.c01)?;
        writeln!(f, "C11= {}", c.c11)?;
        writeln!(f, "C20= {}", c.c20)?;
        writeln!(f, "C21= {}", c.c21)?;
        writeln!(f, "C30= {}", c.c30)?;
        writeln!(f, "---------------")?;
        writeln!(f, "TMP= {}", self.raw_temperature)?;
        writeln!(f, "PRS= {}", self.raw_pressure)?;
        writeln!(f, "TSC= {}", self.scaled.tsc)?;
        writeln!(f, "PSC= {}", self.scaled.psc)?;
        write!(f, "---------------")
    }
}
