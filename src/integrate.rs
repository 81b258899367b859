//! Generic time-stepping driver shared by every integrator in this crate.

const MAX_TIMESTEP: usize = 10_000_000;

/// Implemented by anything that can be advanced one step at a time and
/// knows how to check its own exit criteria (C10's `Dns` implements this).
pub trait Integrate {
    /// Advance the solution by one timestep.
    fn update(&mut self);
    /// Current simulation time.
    fn get_time(&self) -> f64;
    /// Current timestep size.
    fn get_dt(&self) -> f64;
    /// Write results (field dump / analysis line).
    fn write(&mut self);
    /// Additional break criteria beyond the time/step limits.
    fn exit(&mut self) -> bool;
}

/// Drive `pde` forward until `max_time`, a hard timestep ceiling, or
/// `pde.exit()` fires. `save_interval`, when set, triggers `write()` near
/// each multiple of the interval.
pub fn integrate<T: Integrate>(pde: &mut T, max_time: f64, save_interval: Option<f64>) {
    let mut timestep: usize = 0;
    let eps_dt = pde.get_dt() * 1e-4;
    loop {
        pde.update();
        timestep += 1;

        if let Some(dt_save) = &save_interval {
            if (pde.get_time() % dt_save) < pde.get_dt() / 2.
                || (pde.get_time() % dt_save) > dt_save - pde.get_dt() / 2.
            {
                pde.write();
            }
        }

        if pde.get_time() + eps_dt >= max_time {
            log::info!("time limit reached: {:?}", pde.get_time());
            break;
        }
        if timestep >= MAX_TIMESTEP {
            log::warn!("timestep limit reached: {:?}", timestep);
            break;
        }
        if pde.exit() {
            log::info!("break criteria triggered");
            break;
        }
    }
}
